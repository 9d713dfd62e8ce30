//! Contact-mail delivery through the SendGrid v3 mail-send API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use schemasketch_core::{ContactMessage, MailSettings, Result, SketchError};

const SENDGRID_API_BASE: &str = "https://api.sendgrid.com/v3";
const FROM_NAME: &str = "SchemaSketch";
const SUBJECT: &str = "New Contact Form Submission";

/// Delivery seam for contact submissions.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact(&self, message: &ContactMessage) -> Result<()>;
}

/// SendGrid-backed mailer. The real upstream failure is logged; callers only
/// ever see a generic delivery error.
pub struct SendGridMailer {
    settings: MailSettings,
    client: Client,
}

impl SendGridMailer {
    pub fn new(settings: MailSettings) -> Result<Self> {
        if settings.api_key.is_empty() {
            return Err(SketchError::Config(
                "SendGrid API key is required. Set SENDGRID_API_KEY environment variable.".into(),
            ));
        }
        if settings.from_email.is_empty() || settings.to_email.is_empty() {
            return Err(SketchError::Config(
                "mail.from_email and mail.to_email must be configured".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SketchError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { settings, client })
    }

    fn build_request(&self, message: &ContactMessage) -> MailSendRequest {
        let html = format!(
            "<h1>{SUBJECT}</h1>\n<p>Name: {}</p>\n<p>Email: {}</p>\n<p>Message: {}</p>",
            message.name, message.email, message.message
        );

        MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: self.settings.to_email.clone(),
                    name: None,
                }],
            }],
            from: Address {
                email: self.settings.from_email.clone(),
                name: Some(FROM_NAME.to_string()),
            },
            subject: SUBJECT.to_string(),
            content: vec![
                Content {
                    content_type: "text/plain".to_string(),
                    value: SUBJECT.to_string(),
                },
                Content {
                    content_type: "text/html".to_string(),
                    value: html,
                },
            ],
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<()> {
        let request = self.build_request(message);

        let response = self
            .client
            .post(format!("{SENDGRID_API_BASE}/mail/send"))
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Error sending email: {e}");
                SketchError::Mail("failed to send email".into())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(%status, %body, "SendGrid rejected the mail-send request");
            return Err(SketchError::Mail("failed to send email".into()));
        }

        info!(from = %message.email, "contact message forwarded");
        Ok(())
    }
}

// SendGrid v3 mail-send wire types

#[derive(Debug, Serialize)]
struct MailSendRequest {
    personalizations: Vec<Personalization>,
    from: Address,
    subject: String,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<Address>,
}

#[derive(Debug, Serialize)]
struct Address {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MailSettings {
        MailSettings {
            api_key: "sg-key".into(),
            from_email: "noreply@schemasketch.dev".into(),
            to_email: "team@schemasketch.dev".into(),
        }
    }

    fn contact() -> ContactMessage {
        ContactMessage {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "I need a schema".into(),
        }
    }

    #[test]
    fn construction_requires_api_key_and_addresses() {
        let mut s = settings();
        s.api_key = String::new();
        assert!(SendGridMailer::new(s).is_err());

        let mut s = settings();
        s.to_email = String::new();
        assert!(SendGridMailer::new(s).is_err());

        assert!(SendGridMailer::new(settings()).is_ok());
    }

    #[test]
    fn request_body_matches_sendgrid_shape() {
        let mailer = SendGridMailer::new(settings()).unwrap();
        let body = serde_json::to_value(mailer.build_request(&contact())).unwrap();

        assert_eq!(
            body["personalizations"][0]["to"][0]["email"],
            "team@schemasketch.dev"
        );
        assert_eq!(body["from"]["email"], "noreply@schemasketch.dev");
        assert_eq!(body["from"]["name"], FROM_NAME);
        assert_eq!(body["subject"], SUBJECT);
        assert_eq!(body["content"][0]["type"], "text/plain");
        assert_eq!(body["content"][1]["type"], "text/html");
        let html = body["content"][1]["value"].as_str().unwrap();
        assert!(html.contains("Name: Ada"));
        assert!(html.contains("ada@example.com"));
    }
}
