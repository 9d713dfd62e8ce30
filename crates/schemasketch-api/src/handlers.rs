use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use schemasketch_core::{BusinessProfile, ContactMessage, EntitySuggestions, GeneratedSchema};

use crate::{ApiError, ApiResult, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub email: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct SuggestionQuery {
    pub business_type: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string(),
    })
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(message): Json<ContactMessage>,
) -> ApiResult<Json<ContactResponse>> {
    message.validate().map_err(ApiError::Sketch)?;

    state.mailer.send_contact(&message).await?;

    Ok(Json(ContactResponse {
        email: message.email,
        message: "Email sent successfully".to_string(),
    }))
}

pub async fn entity_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> ApiResult<Json<EntitySuggestions>> {
    if params.business_type.trim().is_empty() {
        return Err(ApiError::BadRequest("business_type is required".into()));
    }

    let suggestions = state
        .synthesizer
        .suggest_entities(params.business_type.trim())
        .await?;

    Ok(Json(suggestions))
}

pub async fn generate_schema(
    State(state): State<AppState>,
    Json(profile): Json<BusinessProfile>,
) -> ApiResult<Json<GeneratedSchema>> {
    profile.validate().map_err(ApiError::Sketch)?;

    let schema = state.synthesizer.generate_schema(&profile).await?;

    Ok(Json(schema))
}
