//! # Origin/CORS Gate
//!
//! Per-request origin admission. Each route group carries one policy:
//! the sensitive endpoints (create, update, delete, admin list, admin
//! login) use an exact-match allow-list; the public read endpoint admits
//! any origin. Admitted responses echo the matched origin (never `*` for
//! the allow-list policy); rejected requests get a 403 before the method
//! router or any handler runs.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN,
};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Per-endpoint origin admission rule
#[derive(Debug, Clone)]
pub enum OriginPolicy {
    /// Exact string match against an ordered allow-list; an absent
    /// `Origin` header is not admitted
    AllowList(Arc<Vec<String>>),

    /// Every request admitted; responses carry `*`
    Any,
}

impl OriginPolicy {
    pub fn allow_list(origins: Vec<String>) -> Self {
        OriginPolicy::AllowList(Arc::new(origins))
    }

    /// Decide admission for a declared origin. Returns the value to echo
    /// in `Access-Control-Allow-Origin`, or `None` when denied.
    pub fn admit(&self, origin: Option<&str>) -> Option<String> {
        match self {
            OriginPolicy::AllowList(allowed) => {
                let origin = origin?;
                allowed
                    .iter()
                    .find(|candidate| candidate.as_str() == origin)
                    .cloned()
            }
            OriginPolicy::Any => Some("*".to_string()),
        }
    }
}

fn declared_origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(ORIGIN).and_then(|value| value.to_str().ok())
}

fn attach_cors_headers(response: &mut Response, allow_origin: &str) {
    if let Ok(value) = HeaderValue::from_str(allow_origin) {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    response.headers_mut().insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

/// Gate middleware, attached per route group with its policy as state.
///
/// Preflight `OPTIONS` requests pass through untouched; each route's
/// preflight handler owns that path. Every other request is either
/// admitted (and its response decorated with CORS headers, so 405 and
/// validation responses carry them too) or rejected with 403 and no CORS
/// headers.
pub async fn origin_gate(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    match policy.admit(declared_origin(request.headers())) {
        Some(allow_origin) => {
            let mut response = next.run(request).await;
            attach_cors_headers(&mut response, &allow_origin);
            response
        }
        None => ApiError::OriginDenied.into_response(),
    }
}

/// Build the `OPTIONS` preflight handler for one route.
///
/// `methods` names the methods the route supports, e.g. `"POST, OPTIONS"`.
/// Admitted preflights get 204 with the CORS headers; denied ones get a
/// bodyless 403.
pub fn preflight_handler(
    policy: OriginPolicy,
    methods: &'static str,
) -> impl Fn(HeaderMap) -> std::future::Ready<Response> + Clone + Send + 'static {
    move |headers: HeaderMap| {
        let response = match policy.admit(declared_origin(&headers)) {
            Some(allow_origin) => {
                let mut response = StatusCode::NO_CONTENT.into_response();
                attach_cors_headers(&mut response, &allow_origin);
                response.headers_mut().insert(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(methods),
                );
                response
            }
            None => StatusCode::FORBIDDEN.into_response(),
        };
        std::future::ready(response)
    }
}
