//! Typed bindings for the upstream admin API.
//!
//! The wrappers here only fix the endpoint path, method, and payload shape;
//! all transport behavior lives in [`Gateway::call`](super::Gateway::call).

use serde::Deserialize;
use serde_json::json;

use super::{ApiResult, Gateway};

pub const LOGIN: &str = "/admin/api/login";
pub const USER_INFO: &str = "/admin/api/settings/user-info";
pub const USERS: &str = "/admin/api/users";
pub const COMPANIES: &str = "/admin/api/companies";
pub const CUSTOMERS: &str = "/admin/api/customers";
pub const DEVICES: &str = "/admin/api/devices";
pub const PERMISSIONS: &str = "/admin/api/permissions";
pub const DEFAULT_PASSWORD: &str = "/admin/api/settings/default-password";
pub const HEALTH: &str = "/health";

pub fn company(id: i64) -> String {
    format!("{COMPANIES}/{id}")
}

pub fn customer(id: i64) -> String {
    format!("{CUSTOMERS}/{id}")
}

pub fn customers_by_company(company_id: i64) -> String {
    format!("{CUSTOMERS}/by-company/{company_id}")
}

pub fn device(id: i64) -> String {
    format!("{DEVICES}/{id}")
}

pub fn devices_by_company(company_id: i64) -> String {
    format!("{DEVICES}/by-company/{company_id}")
}

pub fn permissions_by_company(company_id: i64) -> String {
    format!("{PERMISSIONS}/by-company/{company_id}")
}

pub fn permission(customer_id: i64, device_id: i64) -> String {
    format!("{PERMISSIONS}/{customer_id}/{device_id}")
}

pub fn user(id: i64) -> String {
    format!("{USERS}/{id}")
}

pub fn user_reset_password(id: i64) -> String {
    format!("{USERS}/{id}/reset-password")
}

pub fn user_unlock(id: i64) -> String {
    format!("{USERS}/{id}/unlock")
}

/// Token pair issued by the upstream on a successful login.
/// Older backend revisions named the field `token`; accept both.
#[derive(Debug, Deserialize)]
pub struct LoginTokens {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Identity of the authenticated caller as the upstream sees it.
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Upstream liveness probe payload.
#[derive(Debug, Deserialize, serde::Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub mqtt_connected: Option<bool>,
    #[serde(default)]
    pub devices_cached: Option<i64>,
}

impl Gateway {
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginTokens> {
        let body = json!({ "username": username, "password": password });
        self.post(LOGIN, &body, None).await
    }

    pub async fn user_info(&self, token: &str) -> ApiResult<UserInfo> {
        self.get(USER_INFO, Some(token)).await
    }

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.get(HEALTH, None).await
    }
}
