// Cross-cutting HTTP layers: panics, security headers, CORS, access logging

use crate::core::config::{Config, CorsConfig, Environment};
use crate::core::error::server_fault_response;
use axum::{
    http::{HeaderName, HeaderValue, Method},
    response::Response,
    Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Headers added to every response unless the handler already set them
pub const SECURITY_HEADERS: [(&str, &str); 12] = [
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;form-action 'self';\
         frame-ancestors 'self';img-src 'self' data:;object-src 'none';script-src 'self';\
         script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Wrap the router with the service-wide layers
pub fn apply(router: Router, config: &Config) -> Router {
    let environment = config.server.environment;

    let router = router.layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
        panic_response(environment, panic)
    }));

    let router = SECURITY_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        });

    router
        .layer(cors_layer(&config.cors))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(!environment.is_production()),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AnyOrigin);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(AnyOrigin);
    }

    // Origins are checked by Config::validate
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    layer.allow_origin(origins)
}

fn panic_response(environment: Environment, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    server_fault_response(environment, &detail, &format!("panic: {}", detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::testing::test_config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    async fn panicking_handler() -> &'static str {
        panic!("stone hit the wall")
    }

    fn app(config: &Config) -> Router {
        let router = Router::new()
            .route("/ok", get(ok_handler))
            .route("/boom", get(panicking_handler));
        apply(router, config)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let config = test_config(Environment::Development);
        let response = app(&config)
            .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(response.headers()[name], value, "header {}", name);
        }
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let config = test_config(Environment::Development);
        let response = app(&config)
            .oneshot(
                Request::get("/ok")
                    .header("origin", "https://curling.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let mut config = test_config(Environment::Development);
        config.cors.allowed_origins = vec!["https://curling.example".to_string()];

        let allowed = app(&config)
            .oneshot(
                Request::get("/ok")
                    .header("origin", "https://curling.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "https://curling.example"
        );

        let denied = app(&config)
            .oneshot(
                Request::get("/ok")
                    .header("origin", "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_panic_hidden_in_production() {
        let config = test_config(Environment::Production);
        let response = app(&config)
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": { "message": "server error" } })
        );
    }

    #[tokio::test]
    async fn test_panic_detailed_in_development() {
        let config = test_config(Environment::Development);
        let response = app(&config)
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get("x-content-type-options").is_some());
        let body = json_body(response).await;
        assert_eq!(body["message"], "stone hit the wall");
        assert_eq!(body["error"], "panic: stone hit the wall");
    }
}
