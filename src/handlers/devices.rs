//! Device CRUD pass-throughs.

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

/// GET /api/devices - list all devices
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .gateway
        .get::<Value>(backend::DEVICES, Some(&session.token))
        .await;
    Ok(Json(unwrap_list(result.into_data()?, "devices")))
}

/// POST /api/devices - register a device (admin+)
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    policy::require_role(&session, policy::ADMIN)?;

    let body = require_body(body)?;
    if str_field(&body, "device_id").is_none() {
        return Err(ApiError::bad_request("device_id is required"));
    }

    let result = state
        .gateway
        .post::<Value>(backend::DEVICES, &body, Some(&session.token))
        .await;
    let data = result.into_data()?.unwrap_or(Value::Null);
    Ok((StatusCode::CREATED, Json(data)))
}

/// GET /api/devices/:id - single device
pub async fn show(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .gateway
        .get::<Value>(&backend::device(id), Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// PUT /api/devices/:id - update a device (admin+)
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
        .put::<Value>(&backend::device(id), &body, Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// DELETE /api/devices/:id - delete a device (superadmin only)
pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    policy::require_superadmin(&session)?;
    let id = parse_id(&id)?;

    state
        .gateway
        .delete::<Value>(&backend::device(id), Some(&session.token))
        .await
        .into_data()?;
    Ok(Json(json!({ "success": true })))
}
