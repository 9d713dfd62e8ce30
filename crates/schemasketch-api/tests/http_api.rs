use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use schemasketch_ai::{GenerationConfig, LlmProvider, LlmResponse, Message, SchemaSynthesizer};
use schemasketch_api::{create_router, AppState};
use schemasketch_core::{ContactMessage, Result, SketchError};
use schemasketch_mailer::Mailer;

const VALID_REPLY: &str = "```sql\nCREATE TABLE books (id INT PRIMARY KEY);\n```\n\
```mermaid\nerDiagram\n    BOOKS {\n        int id\n    }\n    CUSTOMERS {\n        int id\n    }\n    CUSTOMERS ||--o{ BOOKS : buys\n```";

struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        _messages: &[Message],
        _config: &GenerationConfig,
    ) -> Result<LlmResponse> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SketchError::Provider("script exhausted".into()))?;
        Ok(LlmResponse {
            content: reply,
            total_tokens: None,
            prompt_tokens: None,
            completion_tokens: None,
            finish_reason: Some("stop".into()),
            model: "scripted".into(),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<ContactMessage>>,
    fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<()> {
        if self.fail {
            return Err(SketchError::Mail("failed to send email".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn router_with(replies: Vec<&str>, mailer: Arc<RecordingMailer>) -> axum::Router {
    let provider = Arc::new(ScriptedProvider::new(replies));
    let synthesizer = Arc::new(SchemaSynthesizer::new(provider, 3));
    create_router(AppState::with_parts(synthesizer, mailer))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router_with(vec![], Arc::new(RecordingMailer::default()));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn contact_submission_forwards_to_mailer() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = router_with(vec![], mailer.clone());

    let response = app
        .oneshot(post_json(
            "/contact",
            json!({"name": "Ada", "email": "ada@example.com", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["message"], "Email sent successfully");
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn contact_with_missing_fields_is_rejected() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = router_with(vec![], mailer.clone());

    let response = app
        .oneshot(post_json(
            "/contact",
            json!({"name": "", "email": "ada@example.com", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mailer_failure_yields_generic_message() {
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let app = router_with(vec![], mailer);

    let response = app
        .oneshot(post_json(
            "/contact",
            json!({"name": "Ada", "email": "ada@example.com", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to send email");
}

#[tokio::test]
async fn suggestions_require_business_type() {
    let app = router_with(vec![], Arc::new(RecordingMailer::default()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/schema/suggestions?business_type=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suggestions_return_parsed_categories() {
    let app = router_with(
        vec![r#"{"people": ["customer"], "resources": ["book"], "activities": ["sale"]}"#],
        Arc::new(RecordingMailer::default()),
    );
    let response = app
        .oneshot(
            Request::builder()
                .uri("/schema/suggestions?business_type=bookstore")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["people"][0], "customer");
    assert_eq!(body["resources"][0], "book");
}

#[tokio::test]
async fn generate_returns_schema_in_camel_case() {
    let app = router_with(vec![VALID_REPLY], Arc::new(RecordingMailer::default()));
    let response = app
        .oneshot(post_json(
            "/schema/generate",
            json!({
                "name": "Corner Books",
                "businessType": "bookstore",
                "people": ["customer"],
                "resources": ["book"],
                "activities": ["sale"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["sqlCode"].as_str().unwrap().contains("CREATE TABLE"));
    assert!(body["mermaidCode"]
        .as_str()
        .unwrap()
        .starts_with("erDiagram"));
}

#[tokio::test]
async fn generate_rejects_empty_profile() {
    let app = router_with(vec![], Arc::new(RecordingMailer::default()));
    let response = app
        .oneshot(post_json(
            "/schema/generate",
            json!({"name": "", "businessType": "bookstore"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_surfaces_terminal_validation_failure() {
    let app = router_with(
        vec!["not a schema", "still not", "nope"],
        Arc::new(RecordingMailer::default()),
    );
    let response = app
        .oneshot(post_json(
            "/schema/generate",
            json!({
                "name": "Corner Books",
                "businessType": "bookstore",
                "people": ["customer"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("gave up after 3 attempts"));
}
