//! Console user management pass-throughs.

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

use super::{parse_id, require_body, str_field};

/// GET /api/users - list console users
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .gateway
        .get::<Value>(backend::USERS, Some(&session.token))
        .await;
    // the users collection is the one the upstream returns unwrapped
    Ok(Json(result.into_data()?.unwrap_or_else(|| json!([]))))
}

/// POST /api/users - create a user (admin+)
///
/// New accounts always start on the upstream's default password; the caller
/// never chooses one here.
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    policy::require_role(&session, policy::ADMIN)?;

    let body = require_body(body)?;
    if str_field(&body, "username").is_none() || str_field(&body, "role").is_none() {
        return Err(ApiError::bad_request("username and role are required"));
    }

    let Some(fields) = body.as_object() else {
        return Err(ApiError::bad_request("invalid request body"));
    };
    let mut payload = fields.clone();
    payload.insert("password".to_string(), json!("default"));

    let result = state
        .gateway
        .post::<Value>(backend::USERS, &Value::Object(payload), Some(&session.token))
        .await;
    let data = result.into_data()?.unwrap_or(Value::Null);
    Ok((StatusCode::CREATED, Json(data)))
}

/// PUT /api/users/:id - update a user (admin+)
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
        .put::<Value>(&backend::user(id), &body, Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// DELETE /api/users/:id - delete a user (admin+)
pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    policy::require_role(&session, policy::ADMIN)?;
    let id = parse_id(&id)?;

    state
        .gateway
        .delete::<Value>(&backend::user(id), Some(&session.token))
        .await
        .into_data()?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/users/:id/reset-password - reset to the default password (admin+)
pub async fn reset_password(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    policy::require_role(&session, policy::ADMIN)?;
    let id = parse_id(&id)?;

    let result = state
        .gateway
        .post::<Value>(
            &backend::user_reset_password(id),
            &json!({}),
            Some(&session.token),
        )
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// POST /api/users/:id/unlock - clear a lockout after failed logins (admin+)
pub async fn unlock(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    policy::require_role(&session, policy::ADMIN)?;
    let id = parse_id(&id)?;

    let result = state
        .gateway
        .post::<Value>(&backend::user_unlock(id), &json!({}), Some(&session.token))
        .await;
    Ok(Json(
        result
            .into_data()?
            .unwrap_or_else(|| json!({ "success": true })),
    ))
}
