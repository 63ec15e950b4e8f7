use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::session::Session;

/// Authenticated session context extracted from the request cookie.
///
/// Rejects with 401 when the cookie is absent or undecodable; a malformed
/// cookie is indistinguishable from a missing one at this boundary.
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Session::from_headers(&parts.headers, &state.config.session.cookie_name)
            .map(CurrentSession)
            .ok_or_else(|| ApiError::unauthorized("unauthorized"))
    }
}
