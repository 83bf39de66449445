//! Admin login route.
//!
//! Single shared-secret check against the configured master password,
//! compared in constant time. An unconfigured secret surfaces as a 500
//! on this endpoint, not as a startup failure.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use subtle::ConstantTimeEq;

use super::server::AppState;
use crate::cors::{preflight_handler, OriginPolicy};
use crate::error::{method_not_allowed, ApiError};

pub fn routes(policy: &OriginPolicy) -> Router<Arc<AppState>> {
    Router::new().route(
        "/admin-login",
        post(login_handler)
            .options(preflight_handler(policy.clone(), "POST, OPTIONS"))
            .fallback(method_not_allowed("POST")),
    )
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    message: &'static str,
}

fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Invalid("Invalid request.".to_string()))?;
    let password = value
        .get("password")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Invalid("Invalid request.".to_string()))?;

    let secret = state
        .master_password
        .as_deref()
        .ok_or(ApiError::ServerConfiguration)?;

    if constant_time_str_eq(password, secret) {
        Ok((
            StatusCode::OK,
            Json(LoginResponse {
                message: "Login successful.",
            }),
        ))
    } else {
        Err(ApiError::Unauthorized)
    }
}
