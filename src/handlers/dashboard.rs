//! Composite dashboard view.
//!
//! The one place a single request fans out to several upstream reads. The
//! branches are independent and order-insensitive; a failed branch degrades
//! to an empty count instead of failing the whole response.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::gateway::{backend, ApiResult};
use crate::middleware::CurrentSession;

use super::unwrap_list;

fn branch_count(result: ApiResult<Value>, key: &str) -> usize {
    unwrap_list(result.data, key)
        .as_array()
        .map(Vec::len)
        .unwrap_or(0)
}

/// GET /api/dashboard/stats - fleet totals plus backend health
pub async fn stats(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, ApiError> {
    let token = session.token.as_str();

    let (companies, customers, devices, health) = tokio::join!(
        state.gateway.get::<Value>(backend::COMPANIES, Some(token)),
        state.gateway.get::<Value>(backend::CUSTOMERS, Some(token)),
        state.gateway.get::<Value>(backend::DEVICES, Some(token)),
        state.gateway.health(),
    );

    let backend_health = match health.data {
        Some(status) => json!(status),
        None => json!({ "status": "unknown" }),
    };

    Ok(Json(json!({
        "companies": branch_count(companies, "companies"),
        "customers": branch_count(customers, "customers"),
        "devices": branch_count(devices, "devices"),
        "backend": backend_health,
    })))
}
