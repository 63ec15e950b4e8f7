//! Default-password settings. Superadmin only, both directions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::gateway::backend;
use crate::middleware::CurrentSession;
use crate::policy;

use super::require_body;

const MIN_PASSWORD_LENGTH: usize = 6;

/// GET /api/settings/default-password - current default password
pub async fn show_default_password(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, ApiError> {
    policy::require_superadmin(&session)?;

    let result = state
        .gateway
        .get::<Value>(backend::DEFAULT_PASSWORD, Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// PUT /api/settings/default-password - replace the default password
pub async fn update_default_password(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    policy::require_superadmin(&session)?;

    let body = require_body(body)?;
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(
            "password must be at least 6 characters",
        ));
    }

    state
        .gateway
        .put::<Value>(
            backend::DEFAULT_PASSWORD,
            &json!({ "password": password }),
            Some(&session.token),
        )
        .await
        .into_data()?;
    Ok(Json(json!({
        "success": true,
        "message": "default password updated",
    })))
}
