use serde::{Deserialize, Serialize};

use crate::{Result, SketchError};

/// A contact-form submission. Forwarded to the mail provider, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SketchError::InvalidInput("name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(SketchError::InvalidInput("email is required".into()));
        }
        if !self.email.contains('@') {
            return Err(SketchError::InvalidInput(
                "email must be a valid address".into(),
            ));
        }
        if self.message.trim().is_empty() {
            return Err(SketchError::InvalidInput("message is required".into()));
        }
        Ok(())
    }
}

/// The business description assembled across the wizard steps and sent once
/// to the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub name: String,
    pub business_type: String,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl BusinessProfile {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SketchError::InvalidInput("business name is required".into()));
        }
        if self.business_type.trim().is_empty() {
            return Err(SketchError::InvalidInput("business type is required".into()));
        }
        if self.people.is_empty() && self.resources.is_empty() && self.activities.is_empty() {
            return Err(SketchError::InvalidInput(
                "select at least one person, resource or activity".into(),
            ));
        }
        Ok(())
    }
}

/// Suggested entities for a business type, one list per wizard category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySuggestions {
    pub people: Vec<String>,
    pub resources: Vec<String>,
    pub activities: Vec<String>,
}

/// The synthesized design: SQL DDL plus Mermaid erDiagram source.
/// Returned to the caller and never persisted server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSchema {
    pub sql_code: String,
    pub mermaid_code: String,
}
