// Centralized error handling for the registry

use crate::core::config::Environment;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

const NOT_FOUND_MESSAGE: &str = "User not found";

/// Rejections of a registration request, checked in declaration order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username required")]
    UsernameRequired,

    #[error("password required")]
    PasswordRequired,

    #[error("favoriteClub required")]
    FavoriteClubRequired,

    #[error("username length out of range")]
    UsernameLength,

    #[error("password length out of range")]
    PasswordLength,

    #[error("password must contain a digit")]
    PasswordFormat,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User store lock poisoned")]
    Poisoned,

    #[error("Duplicate user id: {0}")]
    DuplicateId(String),
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no such user")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// Unclassified fault; the response shape depends on the environment
    #[error("{fault}")]
    Internal {
        environment: Environment,
        fault: anyhow::Error,
    },
}

impl ApiError {
    pub fn internal(environment: Environment, fault: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal {
            environment,
            fault: fault.into(),
        }
    }

    pub fn from_registration(err: RegistrationError, environment: Environment) -> Self {
        match err {
            RegistrationError::Validation(e) => ApiError::Validation(e),
            RegistrationError::NotFound => ApiError::NotFound,
            RegistrationError::Store(e) => ApiError::internal(environment, e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => plain_text(StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::NotFound => plain_text(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            ApiError::Internal { environment, fault } => {
                let message = fault.to_string();
                let detail = format!("{:?}", fault.root_cause());
                server_fault_response(environment, &message, &detail)
            }
        }
    }
}

fn plain_text(status: StatusCode, message: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

/// Body of a 500 response
///
/// Production hides the fault; other environments expose the message and the raw fault.
pub fn server_fault_body(environment: Environment, message: &str, detail: &str) -> Value {
    if environment.is_production() {
        json!({ "error": { "message": "server error" } })
    } else {
        json!({ "message": message, "error": detail })
    }
}

pub fn server_fault_response(environment: Environment, message: &str, detail: &str) -> Response {
    if !environment.is_production() {
        error!(error = %message, detail = %detail, "Unhandled server fault");
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(server_fault_body(environment, message, detail)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = Body::new(response.into_body()).collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_is_plain_400() {
        let response = ApiError::Validation(ValidationError::UsernameRequired).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "username required");
    }

    #[tokio::test]
    async fn test_not_found_is_plain_404() {
        let response = ApiError::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "User not found");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail_in_production() {
        let err = ApiError::internal(Environment::Production, StoreError::Poisoned);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body, json!({ "error": { "message": "server error" } }));
    }

    #[tokio::test]
    async fn test_internal_error_exposes_detail_outside_production() {
        let err = ApiError::internal(Environment::Development, StoreError::Poisoned);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["message"], "User store lock poisoned");
        assert!(body["error"].as_str().unwrap().contains("Poisoned"));
    }

    #[test]
    fn test_registration_error_mapping() {
        let env = Environment::Development;

        assert!(matches!(
            ApiError::from_registration(ValidationError::PasswordFormat.into(), env),
            ApiError::Validation(ValidationError::PasswordFormat)
        ));
        assert!(matches!(
            ApiError::from_registration(RegistrationError::NotFound, env),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from_registration(StoreError::Poisoned.into(), env),
            ApiError::Internal { .. }
        ));
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::PasswordRequired.to_string(), "password required");
        assert_eq!(ValidationError::FavoriteClubRequired.to_string(), "favoriteClub required");
        assert_eq!(ValidationError::UsernameLength.to_string(), "username length out of range");
        assert_eq!(ValidationError::PasswordLength.to_string(), "password length out of range");
        assert_eq!(ValidationError::PasswordFormat.to_string(), "password must contain a digit");
        assert_eq!(RegistrationError::NotFound.to_string(), "no such user");
    }
}
