//! Login, session echo, and logout.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentSession;
use crate::policy;
use crate::session::Session;

use super::require_body;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
}

/// Read the `sub` claim from the upstream-issued JWT without verifying the
/// signature. The upstream minted this token a moment ago; locally it is only
/// an identity container, never a trust decision.
fn decode_token_subject(token: &str) -> Option<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims.sub)
        .filter(|sub| !sub.is_empty())
}

/// POST /api/auth/login - authenticate against the upstream and mint a session
///
/// No session cookie is written unless every step succeeds.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = require_body(body)?;

    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    // Upstream authenticates the credentials; its status and message pass
    // through on failure.
    let tokens = state
        .gateway
        .login(&username, &password)
        .await
        .into_data()?
        .ok_or_else(|| ApiError::upstream(401, "invalid credentials"))?;

    let subject = decode_token_subject(&tokens.access_token)
        .ok_or_else(|| ApiError::internal_server_error("invalid token"))?;

    // A failed role lookup does not fail the login: the token is good, so the
    // user lands on the lowest privilege tier.
    let role = match state.gateway.user_info(&tokens.access_token).await.into_data() {
        Ok(Some(info)) => info.role,
        _ => policy::VIEWER.to_string(),
    };

    let session = Session::new(tokens.access_token, subject, role);
    let cookie = session.to_cookie_header(&state.config.session);

    tracing::info!("login: {} ({})", session.username, session.role);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({
            "success": true,
            "user": {
                "username": session.username,
                "role": session.role,
            },
        })),
    ))
}

/// GET /api/auth/session - identity of the current session
pub async fn session(CurrentSession(session): CurrentSession) -> Json<Value> {
    Json(json!({
        "username": session.username,
        "role": session.role,
    }))
}

/// DELETE /api/auth/session - destroy the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = Session::delete_cookie_header(&state.config.session);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "success": true })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64url without padding, enough to build a syntactically valid JWT
    fn b64url(data: &str) -> String {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine as _;
        URL_SAFE_NO_PAD.encode(data)
    }

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            b64url(r#"{"alg":"HS256","typ":"JWT"}"#),
            b64url(payload),
            b64url("sig")
        )
    }

    #[test]
    fn subject_is_read_without_verification() {
        let token = token_with_payload(r#"{"sub":"maria","exp":4102444800}"#);
        assert_eq!(decode_token_subject(&token).as_deref(), Some("maria"));
    }

    #[test]
    fn expired_tokens_still_decode() {
        // exp far in the past; only the payload matters here
        let token = token_with_payload(r#"{"sub":"maria","exp":1}"#);
        assert_eq!(decode_token_subject(&token).as_deref(), Some("maria"));
    }

    #[test]
    fn malformed_tokens_yield_none() {
        assert_eq!(decode_token_subject("not-a-jwt"), None);
        assert_eq!(decode_token_subject("a.b"), None);
        assert_eq!(decode_token_subject(""), None);

        let no_sub = token_with_payload(r#"{"user":"maria"}"#);
        assert_eq!(decode_token_subject(&no_sub), None);

        let empty_sub = token_with_payload(r#"{"sub":""}"#);
        assert_eq!(decode_token_subject(&empty_sub), None);
    }
}
