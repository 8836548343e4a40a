//! # Route Handlers
//!
//! The root banner, health check, schema listing, and the `/chat` endpoint that
//! runs a question through the `QueryClient`.

use crate::{errors::AppError, state::AppState};
use asksql::{ErrorKind, QueryOutcome, SchemaDescriptor};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

// --- API Payloads ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model_configured: bool,
}

#[derive(Serialize)]
pub struct SchemaResponse {
    pub success: bool,
    pub schema: SchemaDescriptor,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// The pipeline outcome plus transport-level fields.
#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: QueryOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// --- Handlers ---

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "asksql server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now(),
        model_configured: app_state.query_client.is_model_configured(),
    })
}

/// Returns the live schema descriptor.
pub async fn schema_handler(
    State(app_state): State<AppState>,
) -> Result<Json<SchemaResponse>, AppError> {
    let schema = app_state.query_client.schema().await?;
    Ok(Json(SchemaResponse {
        success: true,
        schema,
        timestamp: now(),
    }))
}

/// Answers one natural-language question.
///
/// Validation and execution failures are part of the answer, so they come back
/// with `200` and `success: false`; only a bad request body is a `400`.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    info!("Received chat message: '{}'", request.message);

    let outcome = app_state.query_client.ask(&request.message).await;
    if outcome.error_kind == Some(ErrorKind::EmptyInputError) {
        return Err(AppError::BadRequest(
            outcome.error_detail.unwrap_or_default(),
        ));
    }

    let message = outcome
        .result_count
        .filter(|_| outcome.accepted)
        .map(|n| format!("Found {n} result(s)"));
    let error = outcome.error_detail.clone();

    Ok(Json(ChatResponse {
        success: outcome.accepted,
        outcome,
        message,
        error,
        timestamp: now(),
    }))
}
