//! Origin/CORS gate tests.
//!
//! The sensitive endpoints share one exact-match allow-list; the public
//! listing admits any origin. These tests pin down admission, rejection
//! ordering (origin check before method and validation), header echoing,
//! and preflight behavior per endpoint.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use guestlist::config::Config;
use guestlist::http_server::build_router;
use guestlist::submissions::{InMemorySubmissionStore, SubmissionStore};

const ALLOWED_ORIGIN: &str = "https://events.example";
const OTHER_ALLOWED_ORIGIN: &str = "http://localhost:5173";
const DENIED_ORIGIN: &str = "https://evil.example";

fn app() -> Router {
    let config = Config {
        supabase_url: "http://localhost".to_string(),
        anon_key: "anon".to_string(),
        service_key: "service".to_string(),
        master_password: Some("s3cret".to_string()),
        allowed_origins: vec![
            ALLOWED_ORIGIN.to_string(),
            OTHER_ALLOWED_ORIGIN.to_string(),
        ],
    };
    build_router(
        &config,
        Arc::new(InMemorySubmissionStore::new()) as Arc<dyn SubmissionStore>,
    )
}

fn request(method: &str, uri: &str, origin: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn allow_origin(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap())
}

// =============================================================================
// NON-PREFLIGHT ADMISSION
// =============================================================================

#[tokio::test]
async fn test_denied_origin_gets_403_without_cors_headers() {
    let app = app();
    for (method, uri) in [
        ("POST", "/submissions"),
        ("GET", "/submissions"),
        ("PATCH", "/submissions/1"),
        ("DELETE", "/submissions/1"),
        ("POST", "/admin-login"),
    ] {
        let response = send(&app, request(method, uri, Some(DENIED_ORIGIN), None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        assert!(allow_origin(&response).is_none(), "{method} {uri}");
        assert_eq!(
            body_json(response).await["error"],
            "Requests from this origin are not permitted."
        );
    }
}

#[tokio::test]
async fn test_absent_origin_is_not_admitted_on_sensitive_endpoints() {
    let app = app();
    let response = send(&app, request("GET", "/submissions", None, None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(allow_origin(&response).is_none());
}

#[tokio::test]
async fn test_admitted_response_echoes_exact_origin() {
    let app = app();
    for origin in [ALLOWED_ORIGIN, OTHER_ALLOWED_ORIGIN] {
        let response = send(
            &app,
            request(
                "POST",
                "/submissions",
                Some(origin),
                Some(json!({"name": "Ana", "email": "a@x.com"})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(allow_origin(&response), Some(origin));
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
                .to_str()
                .unwrap(),
            "Content-Type"
        );
    }
}

/// Test: the gate runs first, so origin rejection wins over validation
/// and method checks.
#[tokio::test]
async fn test_origin_check_precedes_validation_and_method_check() {
    let app = app();

    let response = send(
        &app,
        request("POST", "/submissions", Some(DENIED_ORIGIN), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, request("PUT", "/submissions", Some(DENIED_ORIGIN), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Test: error responses to admitted origins still carry CORS headers.
#[tokio::test]
async fn test_error_responses_from_admitted_origins_carry_cors_headers() {
    let app = app();

    let response = send(
        &app,
        request("POST", "/submissions", Some(ALLOWED_ORIGIN), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(allow_origin(&response), Some(ALLOWED_ORIGIN));

    let response = send(&app, request("PUT", "/submissions", Some(ALLOWED_ORIGIN), None)).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(allow_origin(&response), Some(ALLOWED_ORIGIN));
}

// =============================================================================
// PUBLIC READ (open origin)
// =============================================================================

#[tokio::test]
async fn test_public_listing_admits_any_origin_as_wildcard() {
    let app = app();
    for origin in [Some(DENIED_ORIGIN), Some(ALLOWED_ORIGIN), None] {
        let response = send(&app, request("GET", "/public-submissions", origin, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(allow_origin(&response), Some("*"));
    }
}

// =============================================================================
// PREFLIGHT
// =============================================================================

#[tokio::test]
async fn test_preflight_names_the_methods_of_each_endpoint() {
    let app = app();
    let cases = [
        ("/submissions", "GET, POST, OPTIONS"),
        ("/submissions/1", "PATCH, DELETE, OPTIONS"),
        ("/admin-login", "POST, OPTIONS"),
    ];
    for (uri, methods) in cases {
        let response = send(&app, request("OPTIONS", uri, Some(ALLOWED_ORIGIN), None)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{uri}");
        assert_eq!(allow_origin(&response), Some(ALLOWED_ORIGIN), "{uri}");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
                .to_str()
                .unwrap(),
            methods,
            "{uri}"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
                .to_str()
                .unwrap(),
            "Content-Type"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn test_denied_preflight_is_bodyless_403() {
    let app = app();
    let response = send(
        &app,
        request("OPTIONS", "/submissions", Some(DENIED_ORIGIN), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(allow_origin(&response).is_none());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_public_preflight_is_open() {
    let app = app();
    let response = send(
        &app,
        request("OPTIONS", "/public-submissions", Some(DENIED_ORIGIN), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(allow_origin(&response), Some("*"));
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap(),
        "GET, OPTIONS"
    );
}
