//! Upstream gateway client.
//!
//! The single component allowed to talk to the fleet backend. Every call is
//! normalized into an [`ApiResult`]: transport failures become a 500-class
//! error, upstream statuses pass through unchanged, and response bodies are
//! only consumed when the upstream declares JSON.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

pub mod backend;

/// Uniform outcome of one upstream call. Exactly one of `data`/`error` is
/// meaningful; `status` mirrors the upstream HTTP status, or 500 for
/// transport-level failures.
#[derive(Debug)]
pub struct ApiResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ApiResult<T> {
    /// Convert into handler-facing data, surfacing upstream failures as an
    /// [`ApiError`] that keeps the upstream status and message.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        match self.error {
            Some(message) => Err(ApiError::upstream(self.status, message)),
            None => Ok(self.data),
        }
    }

    fn transport_failure() -> Self {
        Self {
            data: None,
            error: Some("backend connection error".to_string()),
            status: 500,
        }
    }
}

pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Perform one upstream call with optional bearer authentication.
    ///
    /// Never returns an `Err` past this boundary and never panics; anything
    /// that goes wrong on the wire degrades into the `error` side of the
    /// result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            // Device and company state changes frequently; intermediaries must
            // not serve stale responses.
            .header(CACHE_CONTROL, "no-store");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("backend request {} {} failed: {}", method, url, err);
                return ApiResult::transport_failure();
            }
        };

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        // 204s and non-JSON bodies leave `data` unset; the status still counts
        let body_value: Option<Value> = if is_json {
            response.json().await.ok()
        } else {
            None
        };

        if !status.is_success() {
            let message = body_value
                .as_ref()
                .and_then(|v| v.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

            return ApiResult {
                data: None,
                error: Some(message),
                status: status.as_u16(),
            };
        }

        ApiResult {
            data: body_value.and_then(|v| serde_json::from_value(v).ok()),
            error: None,
            status: status.as_u16(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> ApiResult<T> {
        self.call(Method::GET, endpoint, None, token).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
        token: Option<&str>,
    ) -> ApiResult<T> {
        self.call(Method::POST, endpoint, Some(body), token).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
        token: Option<&str>,
    ) -> ApiResult<T> {
        self.call(Method::PUT, endpoint, Some(body), token).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
    ) -> ApiResult<T> {
        self.call(Method::DELETE, endpoint, None, token).await
    }
}
