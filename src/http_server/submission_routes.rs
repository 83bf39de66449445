//! Submission CRUD routes.
//!
//! Bodies are parsed permissively into `serde_json::Value` and checked
//! field by field so that every rejection carries the endpoint's own
//! error message rather than a framework rejection. All checks run
//! before the single store call.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::Value;

use super::server::AppState;
use crate::cors::{preflight_handler, OriginPolicy};
use crate::error::{method_not_allowed, ApiError};
use crate::submissions::{NewSubmission, PublicSubmission, Submission};

/// Origin-gated routes: create, admin list, update, delete
pub fn routes(policy: &OriginPolicy) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/submissions",
            get(list_handler)
                .post(create_handler)
                .patch(missing_id_handler)
                .delete(missing_id_handler)
                .options(preflight_handler(policy.clone(), "GET, POST, OPTIONS"))
                .fallback(method_not_allowed("GET, POST")),
        )
        .route(
            "/submissions/:id",
            delete(delete_handler)
                .patch(update_handler)
                .options(preflight_handler(policy.clone(), "PATCH, DELETE, OPTIONS"))
                .fallback(method_not_allowed("PATCH, DELETE")),
        )
}

/// Open-origin route: the redacted public listing
pub fn public_routes(policy: &OriginPolicy) -> Router<Arc<AppState>> {
    Router::new().route(
        "/public-submissions",
        get(public_list_handler)
            .options(preflight_handler(policy.clone(), "GET, OPTIONS"))
            .fallback(method_not_allowed("GET")),
    )
}

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::Invalid("Invalid request.".to_string()))
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

async fn create_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let value = parse_body(&body)?;

    let (name, email) = match (non_empty_str(&value, "name"), non_empty_str(&value, "email")) {
        (Some(name), Some(email)) => (name.to_string(), email.to_string()),
        _ => {
            return Err(ApiError::Invalid(
                "The 'name' and 'email' fields are required.".to_string(),
            ))
        }
    };
    let phone = value
        .get("phone")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let created = state
        .store
        .insert(NewSubmission { name, email, phone })
        .await
        .map_err(ApiError::operation_failed)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let submissions = state
        .store
        .list_all()
        .await
        .map_err(ApiError::query_failed)?;
    Ok(Json(submissions))
}

async fn public_list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PublicSubmission>>, ApiError> {
    let names = state
        .store
        .list_accepted_names()
        .await
        .map_err(ApiError::query_failed)?;
    Ok(Json(names))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Submission>, ApiError> {
    require_id(&id)?;
    let value = parse_body(&body)?;

    let accepted = match value.get("accepted") {
        Some(Value::Bool(accepted)) => *accepted,
        _ => {
            return Err(ApiError::Invalid(
                "The 'accepted' field must be a boolean.".to_string(),
            ))
        }
    };

    match state
        .store
        .set_accepted(&id, accepted)
        .await
        .map_err(ApiError::operation_failed)?
    {
        Some(updated) => Ok(Json(updated)),
        None => Err(ApiError::NotFound),
    }
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_id(&id)?;
    state
        .store
        .delete(&id)
        .await
        .map_err(ApiError::query_failed)?;
    Ok(StatusCode::NO_CONTENT)
}

fn require_id(id: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::Invalid("Submission ID is required.".to_string()));
    }
    Ok(())
}

/// PATCH/DELETE against the bare collection path carry no identifier
async fn missing_id_handler() -> ApiError {
    ApiError::Invalid("Submission ID is required.".to_string())
}
