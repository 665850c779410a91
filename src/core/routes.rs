// HTTP routes configuration

use crate::core::middleware;
use crate::core::state::AppState;
use crate::handlers::{fallback, health, register, users};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let config = Arc::clone(&state.config);

    let router = Router::new()
        .route("/register", post(register::register_handler))
        .route("/user", get(users::list_users_handler))
        .route("/user/{user_id}", delete(users::delete_user_handler))
        .route("/health", get(health::health_handler))

        // Unknown paths and unsupported methods both answer 404
        .fallback(fallback::fallback_handler)
        .method_not_allowed_fallback(fallback::fallback_handler)

        .with_state(state);

    middleware::apply(router, &config)
}
