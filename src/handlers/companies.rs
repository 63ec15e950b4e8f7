//! Company CRUD plus the nested company views (contacts, devices,
//! permissions). All operations are pass-throughs; only the role gates and
//! input validation live here.

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

/// GET /api/companies - list all companies
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .gateway
        .get::<Value>(backend::COMPANIES, Some(&session.token))
        .await;
    Ok(Json(unwrap_list(result.into_data()?, "companies")))
}

/// POST /api/companies - create a company (admin+)
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    policy::require_role(&session, policy::ADMIN)?;

    let body = require_body(body)?;
    if str_field(&body, "name").is_none() {
        return Err(ApiError::bad_request("company name is required"));
    }

    let result = state
        .gateway
        .post::<Value>(backend::COMPANIES, &body, Some(&session.token))
        .await;
    let data = result.into_data()?.unwrap_or(Value::Null);
    Ok((StatusCode::CREATED, Json(data)))
}

/// GET /api/companies/:id - single company
pub async fn show(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .gateway
        .get::<Value>(&backend::company(id), Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// PUT /api/companies/:id - update a company (admin+)
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
        .put::<Value>(&backend::company(id), &body, Some(&session.token))
        .await;
    Ok(Json(result.into_data()?.unwrap_or(Value::Null)))
}

/// DELETE /api/companies/:id - delete a company (superadmin only)
pub async fn remove(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    policy::require_superadmin(&session)?;
    let id = parse_id(&id)?;

    state
        .gateway
        .delete::<Value>(&backend::company(id), Some(&session.token))
        .await
        .into_data()?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/companies/:id/contacts - contacts attached to a company
pub async fn contacts(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .gateway
        .get::<Value>(&backend::customers_by_company(id), Some(&session.token))
        .await;
    Ok(Json(unwrap_list(result.into_data()?, "customers")))
}

/// GET /api/companies/:id/devices - devices assigned to a company
pub async fn devices(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .gateway
        .get::<Value>(&backend::devices_by_company(id), Some(&session.token))
        .await;
    Ok(Json(unwrap_list(result.into_data()?, "devices")))
}

/// GET /api/companies/:id/permissions - device permissions within a company
pub async fn permissions(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .gateway
        .get::<Value>(&backend::permissions_by_company(id), Some(&session.token))
        .await;
    Ok(Json(unwrap_list(result.into_data()?, "permissions")))
}
