use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::user::User;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// List every registered user in registration order
///
/// GET /user
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .registry
        .list()
        .map_err(|e| ApiError::from_registration(e, state.environment()))?;

    Ok(Json(users))
}

/// Delete a user by id
///
/// DELETE /user/{user_id}
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .delete(&user_id)
        .map_err(|e| ApiError::from_registration(e, state.environment()))?;

    Ok(StatusCode::NO_CONTENT)
}
