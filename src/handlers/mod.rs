// Route handlers, one module per console resource.
//
// Every protected operation follows the same shape: read the session cookie,
// check the role, validate identifiers and required fields, delegate to the
// gateway, and map the normalized result onto the response.
pub mod auth;
pub mod companies;
pub mod customers;
pub mod dashboard;
pub mod devices;
pub mod permissions;
pub mod settings;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Unwrap a JSON body extraction, mapping any malformed payload to a 400
/// with a generic message. The parse failure itself stays server-side.
pub(crate) fn require_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!("rejected request body: {}", rejection);
            Err(ApiError::bad_request("invalid request body"))
        }
    }
}

/// Parse a path identifier; anything that is not a well-formed integer is a 400.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("invalid id"))
}

/// The upstream wraps list results in a named field (`{"devices": [...]}`);
/// extract the array, falling back to an empty list when the field is absent.
pub(crate) fn unwrap_list(data: Option<Value>, key: &str) -> Value {
    data.and_then(|value| value.get(key).cloned())
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Non-empty string field lookup used for required-field validation.
pub(crate) fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Positive integer field lookup for foreign-key style body fields.
pub(crate) fn id_field(body: &Value, key: &str) -> Option<i64> {
    body.get(key).and_then(Value::as_i64).filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-1").unwrap(), -1);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn unwrap_list_extracts_named_field() {
        let wrapped = json!({ "devices": [1, 2, 3] });
        assert_eq!(unwrap_list(Some(wrapped), "devices"), json!([1, 2, 3]));
    }

    #[test]
    fn unwrap_list_falls_back_to_empty() {
        assert_eq!(unwrap_list(None, "devices"), json!([]));
        assert_eq!(unwrap_list(Some(json!({})), "devices"), json!([]));
        // a bare array is not the documented envelope; treated as absent
        assert_eq!(unwrap_list(Some(json!([1])), "devices"), json!([]));
    }

    #[test]
    fn field_lookups_reject_empty_values() {
        let body = json!({ "name": "  ", "company_id": 0, "device_id": 7 });
        assert_eq!(str_field(&body, "name"), None);
        assert_eq!(str_field(&body, "missing"), None);
        assert_eq!(id_field(&body, "company_id"), None);
        assert_eq!(id_field(&body, "device_id"), Some(7));
    }
}
