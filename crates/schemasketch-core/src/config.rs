use std::env;

use config as cfg;
use serde::{Deserialize, Serialize};

use crate::{Result, SketchError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3030,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    /// API key, usually supplied via OPENAI_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "OpenAiSettings::default_base_url")]
    pub base_url: String,
    #[serde(default = "OpenAiSettings::default_model")]
    pub model: String,
    #[serde(default = "OpenAiSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Transport-level retries inside the provider.
    #[serde(default = "OpenAiSettings::default_max_retries")]
    pub max_retries: u32,
    /// Validation-level attempts for schema/suggestion generation.
    #[serde(default = "OpenAiSettings::default_max_generation_attempts")]
    pub max_generation_attempts: u32,
}

impl OpenAiSettings {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }

    fn default_timeout_secs() -> u64 {
        120
    }

    fn default_max_retries() -> u32 {
        3
    }

    fn default_max_generation_attempts() -> u32 {
        3
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            timeout_secs: Self::default_timeout_secs(),
            max_retries: Self::default_max_retries(),
            max_generation_attempts: Self::default_max_generation_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailSettings {
    /// API key, usually supplied via SENDGRID_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub to_email: String,
}

/// Layered application configuration: built-in defaults, then an optional
/// `schemasketch.toml`, then `SCHEMASKETCH_*` environment variables, with the
/// provider keys also honored under their conventional names.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SketchConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub mail: MailSettings,
}

impl SketchConfig {
    pub fn load() -> Result<Self> {
        let builder = cfg::Config::builder()
            .add_source(cfg::File::with_name("schemasketch").required(false))
            .add_source(cfg::Environment::with_prefix("SCHEMASKETCH").separator("__"));

        let settings = builder
            .build()
            .map_err(|e| SketchError::Config(e.to_string()))?;

        let mut config: SketchConfig = settings
            .try_deserialize()
            .map_err(|e| SketchError::Config(e.to_string()))?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Conventional env var names used by the original deployment.
    fn apply_env_fallbacks(&mut self) {
        if self.openai.api_key.is_empty() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                self.openai.api_key = key;
            }
        }
        if self.mail.api_key.is_empty() {
            if let Ok(key) = env::var("SENDGRID_API_KEY") {
                self.mail.api_key = key;
            }
        }
        if self.mail.from_email.is_empty() {
            if let Ok(addr) = env::var("FROM_EMAIL") {
                self.mail.from_email = addr;
            }
        }
        if self.mail.to_email.is_empty() {
            if let Ok(addr) = env::var("TO_EMAIL") {
                self.mail.to_email = addr;
            }
        }
    }
}
