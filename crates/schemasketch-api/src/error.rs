use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemasketch_core::SketchError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Sketch(ref err) => match err {
                SketchError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
                SketchError::SchemaValidation(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
                }
                SketchError::Mail(_) => {
                    // the real cause is already logged by the mailer
                    (StatusCode::BAD_GATEWAY, "Failed to send email".to_string())
                }
                SketchError::Provider(_) | SketchError::Http(_) => {
                    error!("upstream failure: {err}");
                    (StatusCode::BAD_GATEWAY, "Upstream service failure".to_string())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
