//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use agent_core::{AgentResponse, ModelInfo};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Run the analyst agent on one query
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);

    async move {
        tracing::info!(chars = payload.message.len(), "Analyzing query");

        state.agent.analyze(&payload.message).await.map(Json).map_err(|e| {
            tracing::error!("Agent error: {}", e);
            internal_error(e.to_string())
        })
    }
    .instrument(span)
    .await
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    let now = chrono::Utc::now();
    #[allow(clippy::cast_precision_loss)]
    let timestamp = now.timestamp_millis() as f64 / 1000.0;

    Json(HealthResponse {
        status: "healthy",
        timestamp,
    })
}

/// List models available from the model service
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let models = state.provider.list_models().await.map_err(|e| {
        tracing::error!("Model listing failed: {}", e);
        internal_error(e.to_string())
    })?;

    Ok(Json(ModelsResponse { models }))
}
