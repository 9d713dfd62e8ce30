use std::sync::Arc;

use tracing::{info, warn};

use schemasketch_core::{BusinessProfile, EntitySuggestions, GeneratedSchema, Result, SketchError};

use crate::llm_provider::{GenerationConfig, LlmProvider, Message};
use crate::{prompt, validator};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Drives the provider through the suggestion and generation operations,
/// re-prompting with a corrective instruction after each rejected reply and
/// giving up after a fixed number of attempts.
pub struct SchemaSynthesizer {
    provider: Arc<dyn LlmProvider>,
    max_attempts: u32,
}

impl SchemaSynthesizer {
    pub fn new(provider: Arc<dyn LlmProvider>, max_attempts: u32) -> Self {
        Self {
            provider,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Generate SQL DDL and a Mermaid erDiagram for the given profile.
    ///
    /// Validation failures are retried with the rejection reason appended to
    /// the prompt; provider/transport errors are not retried here (the
    /// provider has its own transport retry) and propagate immediately.
    pub async fn generate_schema(&self, profile: &BusinessProfile) -> Result<GeneratedSchema> {
        let mut user_prompt = prompt::schema_request(profile);
        let mut last_failure = None;

        for attempt in 1..=self.max_attempts {
            let reply = self.complete(&user_prompt).await?;

            match validator::validate_reply(&reply) {
                Ok(schema) => {
                    info!(
                        attempt,
                        provider = self.provider.provider_name(),
                        model = self.provider.model_name(),
                        "generated schema accepted"
                    );
                    return Ok(schema);
                }
                Err(failure) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        %failure,
                        "generated schema rejected"
                    );
                    user_prompt.push_str(&prompt::schema_correction(&failure));
                    last_failure = Some(failure);
                }
            }
        }

        let reason = last_failure
            .map(|f| f.to_string())
            .unwrap_or_else(|| "no reply produced".to_string());
        Err(SketchError::SchemaValidation(format!(
            "gave up after {} attempts: {reason}",
            self.max_attempts
        )))
    }

    /// Suggest people/resources/activities for a business type.
    pub async fn suggest_entities(&self, business_type: &str) -> Result<EntitySuggestions> {
        let mut user_prompt = prompt::suggestion_request(business_type);
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            let reply = self.complete(&user_prompt).await?;
            let body = validator::strip_code_fence(&reply);

            match serde_json::from_str::<EntitySuggestions>(&body) {
                Ok(suggestions) => return Ok(suggestions),
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "suggestion reply was not valid JSON"
                    );
                    user_prompt.push_str(&prompt::suggestion_correction());
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no reply produced".to_string());
        Err(SketchError::Provider(format!(
            "suggestion reply was not valid JSON after {} attempts: {reason}",
            self.max_attempts
        )))
    }

    async fn complete(&self, user_prompt: &str) -> Result<String> {
        let messages = [
            Message::system(prompt::SYSTEM_PROMPT),
            Message::user(user_prompt),
        ];
        let response = self
            .provider
            .generate(&messages, &GenerationConfig::default())
            .await?;
        Ok(response.content)
    }
}
