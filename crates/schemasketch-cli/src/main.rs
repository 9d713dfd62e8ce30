mod client;
mod wizard;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "schemasketch", version, about = "Design a database from a business description")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the multi-step design wizard
    Design {
        /// Base URL of the SchemaSketch API
        #[arg(long, default_value = "http://127.0.0.1:3030")]
        api_url: String,
        /// Directory for the generated schema.sql and diagram.mmd
        #[arg(long, default_value = "designs")]
        out_dir: PathBuf,
    },
    /// Send a message to the SchemaSketch team
    Contact {
        /// Base URL of the SchemaSketch API
        #[arg(long, default_value = "http://127.0.0.1:3030")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schemasketch_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Design { api_url, out_dir } => {
            let client = ApiClient::new(api_url)?;
            wizard::run_design(&client, &out_dir).await
        }
        Commands::Contact { api_url } => {
            let client = ApiClient::new(api_url)?;
            wizard::run_contact(&client).await
        }
    }
}
