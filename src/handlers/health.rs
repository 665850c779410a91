use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::health::HealthResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Health check handler
///
/// GET /health
pub async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .registry
        .store()
        .len()
        .map_err(|e| ApiError::internal(state.environment(), e))?;

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            users,
            timestamp,
        }),
    ))
}
