//! Session extractor for routes that must hard-fail without a session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use portal_core::SessionRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Valid session of the caller; rejects with 401 otherwise.
pub struct CurrentSession(pub SessionRecord);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .lifecycle
            .require_session(&parts.headers)
            .map(CurrentSession)
            .map_err(|e| state.api_error(e))
    }
}
