use axum::{
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

/// 404 for anything the router does not serve
pub async fn fallback_handler(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("Cannot {} {}", method, uri.path()),
    )
        .into_response()
}
