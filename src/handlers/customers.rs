//! Customer (company contact) CRUD pass-throughs.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::gateway::backend;
use crate::middleware::CurrentSession;
use crate::policy;

use super::{parse_id, require_body, str_field, unwrap_list};

/// GET /api/customers - list all customers
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .gateway
        .get::<Value>(backend::CUSTOMERS, Some(&session.token))
        .await;
    Ok(Json(unwrap_list(result.into_data()?, "customers")))
}

/// POST /api/customers - create a customer (admin+)
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    policy::require_role(&session, policy::ADMIN)?;

    let body = require_body(body)?;
    if str_field(&body, "first_name").is_none()
        || str_field(&body, "last_name").is_none()
        || str_field(&body, "phone").is_none()
    {
        return Err(ApiError::bad_request(
            "first_name, last_name and phone are required",
        ));
    }

    let result = state
        .gateway
        .post::<Value>(backend::CUSTOMERS, &body, Some(&session.token))
        .await;
    let data = result.into_data()?.unwrap_or(Value::Null);
    Ok((StatusCode::CREATED, Json(data)))
}

/// GET /api/customers/:id - single customer
pub async fn show(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .gateway
        .get::<Value>(&backend::customer(id), Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// PUT /api/customers/:id - update a customer (admin+)
pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    policy::require_role(&session, policy::ADMIN)?;
    let id = parse_id(&id)?;
    let body = require_body(body)?;

    let result = state
        .gateway
        .put::<Value>(&backend::customer(id), &body, Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// DELETE /api/customers/:id - delete a customer (superadmin only)
pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    policy::require_superadmin(&session)?;
    let id = parse_id(&id)?;

    state
        .gateway
        .delete::<Value>(&backend::customer(id), Some(&session.token))
        .await
        .into_data()?;
    Ok(Json(json!({ "success": true })))
}
