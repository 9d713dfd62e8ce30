use std::sync::Arc;

use schemasketch_ai::{OpenAiConfig, OpenAiProvider, SchemaSynthesizer};
use schemasketch_core::{Result, SketchConfig};
use schemasketch_mailer::{Mailer, SendGridMailer};

#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<SchemaSynthesizer>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: &SketchConfig) -> Result<Self> {
        let provider = OpenAiProvider::new(OpenAiConfig::from(&config.openai))?;
        let synthesizer = SchemaSynthesizer::new(
            Arc::new(provider),
            config.openai.max_generation_attempts,
        );
        let mailer = SendGridMailer::new(config.mail.clone())?;

        Ok(Self {
            synthesizer: Arc::new(synthesizer),
            mailer: Arc::new(mailer),
        })
    }

    /// Assemble a state from pre-built parts. Used by tests to swap in fake
    /// provider and mailer seams.
    pub fn with_parts(synthesizer: Arc<SchemaSynthesizer>, mailer: Arc<dyn Mailer>) -> Self {
        Self { synthesizer, mailer }
    }
}
