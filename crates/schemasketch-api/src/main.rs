use schemasketch_api::Server;
use schemasketch_core::{SketchConfig, SketchError};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> schemasketch_core::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schemasketch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SketchConfig::load()?;
    let host = config
        .server
        .host
        .parse()
        .map_err(|e| SketchError::Config(format!("invalid server.host: {e}")))?;
    let addr = SocketAddr::new(host, config.server.port);

    let server = Server::new(addr, &config)?;
    server.run().await
}
