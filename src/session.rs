//! Cookie-backed session handling.
//!
//! The session is fully reconstructed from the cookie on every request; there
//! is no server-side session table. The cookie value is base64-encoded JSON
//! carrying the upstream bearer token plus the resolved identity.

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        username: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            role: role.into(),
        }
    }

    /// Serialize to the opaque cookie value.
    pub fn encode(&self) -> String {
        serde_json::to_string(self)
            .map(|json| BASE64.encode(json))
            .unwrap_or_default()
    }

    /// Decode a cookie value. Fails soft: malformed base64, malformed JSON,
    /// or a payload with an empty `token`/`username` all yield `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = BASE64.decode(raw).ok()?;
        let json = String::from_utf8(bytes).ok()?;
        let session: Session = serde_json::from_str(&json).ok()?;

        if session.token.is_empty() || session.username.is_empty() {
            return None;
        }

        Some(session)
    }

    /// Read the session from the request's `Cookie` header.
    /// An absent or unparsable cookie is identical to "no session".
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Self> {
        let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;

        for cookie in cookie_header.split(';') {
            let cookie = cookie.trim();
            if let Some(value) = cookie
                .strip_prefix(cookie_name)
                .and_then(|s| s.strip_prefix('='))
            {
                return Self::decode(value);
            }
        }
        None
    }

    /// `Set-Cookie` value installing this session. Overwrites any prior one.
    pub fn to_cookie_header(&self, config: &SessionConfig) -> String {
        format!(
            "{}={}; HttpOnly; {}SameSite=Lax; Path=/; Max-Age={}",
            config.cookie_name,
            self.encode(),
            if config.secure_cookies { "Secure; " } else { "" },
            config.max_age_secs
        )
    }

    /// `Set-Cookie` value removing the session cookie.
    pub fn delete_cookie_header(config: &SessionConfig) -> String {
        format!(
            "{}=; HttpOnly; {}SameSite=Lax; Path=/; Max-Age=0",
            config.cookie_name,
            if config.secure_cookies { "Secure; " } else { "" },
        )
    }
}
