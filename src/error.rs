//! # API Errors
//!
//! Error taxonomy for the HTTP layer with deterministic status-code
//! mapping. Every handler failure path is one of these variants; nothing
//! propagates as a panic.

use axum::http::header::ALLOW;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::submissions::StoreError;

/// API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request origin is not on the allow-list
    #[error("Requests from this origin are not permitted.")]
    OriginDenied,

    /// Endpoint does not support the request method
    #[error("Method {method} Not Allowed")]
    MethodNotAllowed {
        method: String,
        allow: &'static str,
    },

    /// Request validation failure (missing/malformed fields, bad JSON)
    #[error("{0}")]
    Invalid(String),

    /// Update targeted a nonexistent submission
    #[error("Submission not found.")]
    NotFound,

    /// Persistence failure; detail is the adapter's opaque message
    #[error("{context}")]
    Database {
        context: &'static str,
        detail: String,
    },

    /// Admin shared secret is not configured on the server
    #[error("Server configuration error.")]
    ServerConfiguration,

    /// Admin password mismatch
    #[error("Incorrect password.")]
    Unauthorized,

    /// Uncaught failure
    #[error("An unexpected server error occurred.")]
    Unexpected,
}

impl ApiError {
    /// Translate a store error from an insert or update call site
    pub fn operation_failed(err: StoreError) -> Self {
        ApiError::Database {
            context: "Database operation failed.",
            detail: err.to_string(),
        }
    }

    /// Translate a store error from a select or delete call site
    pub fn query_failed(err: StoreError) -> Self {
        ApiError::Database {
            context: "Database query failed.",
            detail: err.to_string(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::OriginDenied => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServerConfiguration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error is the caller's fault (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        let details = match err {
            ApiError::Database { detail, .. } => Some(detail.clone()),
            _ => None,
        };
        Self {
            error: err.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(error = %self, "request rejected");
        } else {
            tracing::error!(error = %self, "request failed");
        }

        let status = self.status_code();
        let body = Json(ErrorBody::from(&self));
        let mut response = (status, body).into_response();
        if let ApiError::MethodNotAllowed { allow, .. } = self {
            response.headers_mut().insert(
                ALLOW,
                axum::http::HeaderValue::from_static(allow),
            );
        }
        response
    }
}

/// Fallback handler for methods an endpoint does not support.
///
/// Registered as the `MethodRouter` fallback of each route so that any
/// method other than the accepted ones (and `OPTIONS`, which the preflight
/// handler owns) yields a 405 naming the rejected method.
pub fn method_not_allowed(
    allow: &'static str,
) -> impl Fn(Method) -> std::future::Ready<Response> + Clone + Send + 'static {
    move |method: Method| {
        std::future::ready(
            ApiError::MethodNotAllowed {
                method: method.to_string(),
                allow,
            }
            .into_response(),
        )
    }
}
