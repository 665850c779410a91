use crate::core::error::{ApiError, RegistrationError};
use crate::core::state::AppState;
use crate::models::registration::RegisterRequest;
use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Register a new user
///
/// POST /register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let environment = state.environment();

    let request = decode_register_body(&headers, &body)
        .map_err(|e| ApiError::internal(environment, e))?;

    let user = state.registry.create(request).map_err(|e| {
        if let RegistrationError::Validation(reason) = &e {
            warn!(reason = %reason, "Registration rejected");
        }
        ApiError::from_registration(e, environment)
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, user.location())],
        Json(user),
    )
        .into_response())
}

/// Decode a registration body into a request with possibly absent fields.
///
/// A body without a JSON content type, an empty body and a JSON array all carry no
/// fields. An object is decoded field by field. Anything else cannot be decoded.
pub fn decode_register_body(headers: &HeaderMap, body: &[u8]) -> anyhow::Result<RegisterRequest> {
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RegisterRequest::default());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Array(_) => Ok(RegisterRequest::default()),
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        other => Err(anyhow!(
            "Request body must be a JSON object or array, got {}",
            other
        )),
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence.eq_ignore_ascii_case("application/json")
        || essence.to_ascii_lowercase().ends_with("+json")
}
