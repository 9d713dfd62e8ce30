use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use schemasketch_core::{BusinessProfile, ContactMessage, EntitySuggestions, GeneratedSchema};

/// Thin client for the SchemaSketch REST API.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            // generation can retry several provider calls server-side
            .timeout(Duration::from_secs(600))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn entity_suggestions(&self, business_type: &str) -> Result<EntitySuggestions> {
        let response = self
            .client
            .get(format!("{}/schema/suggestions", self.base_url))
            .query(&[("business_type", business_type)])
            .send()
            .await
            .context("Failed to reach the SchemaSketch API")?;

        Self::parse(response).await
    }

    pub async fn generate_schema(&self, profile: &BusinessProfile) -> Result<GeneratedSchema> {
        let response = self
            .client
            .post(format!("{}/schema/generate", self.base_url))
            .json(profile)
            .send()
            .await
            .context("Failed to reach the SchemaSketch API")?;

        Self::parse(response).await
    }

    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/contact", self.base_url))
            .json(message)
            .send()
            .await
            .context("Failed to reach the SchemaSketch API")?;

        let _: serde_json::Value = Self::parse(response).await?;
        Ok(())
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(anyhow!("API error ({status}): {message}"));
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse API response")
    }
}
