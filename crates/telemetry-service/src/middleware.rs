//! Security middleware for the telemetry-service API.
//!
//! This module adds hardening headers to every response, similar to what
//! browsers expect from a public HTTP endpoint. Headers already set by a
//! handler are left untouched.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::SecurityConfig;

/// Headers added to every response when `security.headers` is enabled.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", "default-src 'self'"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Security headers middleware.
///
/// Use with `axum::middleware::from_fn_with_state` and the service's
/// [`SecurityConfig`].
pub async fn security_headers(
    State(config): State<Arc<SecurityConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if !config.headers {
        return response;
    }

    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers
            .entry(HeaderName::from_static(name))
            .or_insert_with(|| HeaderValue::from_static(value));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app(headers: bool) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route(
                "/framed",
                get(|| async { ([("x-frame-options", "DENY")], "ok") }),
            )
            .layer(axum::middleware::from_fn_with_state(
                Arc::new(SecurityConfig { headers }),
                security_headers,
            ))
    }

    fn request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_security_headers_added() {
        let response = app(true).oneshot(request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(response.headers()[*name], *value, "header {name}");
        }
    }

    #[tokio::test]
    async fn test_security_headers_isolation_and_legacy() {
        let response = app(true).oneshot(request("/")).await.unwrap();
        let headers = response.headers();

        assert_eq!(headers["cross-origin-resource-policy"], "same-origin");
        assert_eq!(headers["origin-agent-cluster"], "?1");
        assert_eq!(headers["x-permitted-cross-domain-policies"], "none");
        assert_eq!(headers["x-xss-protection"], "0");
    }

    #[tokio::test]
    async fn test_security_headers_keep_handler_values() {
        let response = app(true).oneshot(request("/framed")).await.unwrap();
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_security_headers_disabled() {
        let response = app(false).oneshot(request("/")).await.unwrap();
        assert!(response.headers().get("x-content-type-options").is_none());
    }

    #[tokio::test]
    async fn test_security_headers_on_not_found() {
        let response = app(true).oneshot(request("/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["referrer-policy"], "no-referrer");
    }
}
