//! Device-permission grants linking customers to devices.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::gateway::backend;
use crate::middleware::CurrentSession;
use crate::policy;

use super::{id_field, parse_id, require_body};

/// POST /api/permissions - create or update a grant (admin+)
///
/// Capability flags are optional; absent flags take the upstream's
/// conventional defaults (view/control/alerts on, configure off).
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    policy::require_role(&session, policy::ADMIN)?;

    let body = require_body(body)?;
    let (Some(customer_id), Some(device_id)) =
        (id_field(&body, "customer_id"), id_field(&body, "device_id"))
    else {
        return Err(ApiError::bad_request(
            "customer_id and device_id are required",
        ));
    };

    let flag = |key: &str, default: bool| {
        body.get(key).and_then(Value::as_bool).unwrap_or(default)
    };
    let payload = json!({
        "customer_id": customer_id,
        "device_id": device_id,
        "can_view": flag("can_view", true),
        "can_control": flag("can_control", true),
        "can_configure": flag("can_configure", false),
        "receive_alerts": flag("receive_alerts", true),
    });

    let result = state
        .gateway
        .post::<Value>(backend::PERMISSIONS, &payload, Some(&session.token))
        .await;
    let data = result.into_data()?.unwrap_or(Value::Null);
    Ok((StatusCode::CREATED, Json(data)))
}

#[derive(Debug, Deserialize)]
pub struct RemoveParams {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// DELETE /api/permissions?customer_id=&device_id= - revoke a grant (admin+)
pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<RemoveParams>,
) -> Result<Json<Value>, ApiError> {
    policy::require_role(&session, policy::ADMIN)?;

    let (Some(customer_id), Some(device_id)) = (params.customer_id, params.device_id) else {
        return Err(ApiError::bad_request(
            "customer_id and device_id are required",
        ));
    };
    let customer_id = parse_id(&customer_id)?;
    let device_id = parse_id(&device_id)?;

    state
        .gateway
        .delete::<Value>(
            &backend::permission(customer_id, device_id),
            Some(&session.token),
        )
        .await
        .into_data()?;
    Ok(Json(json!({ "success": true })))
}
