//! Session inspection endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use portal_core::AuthError;
use portal_shared::constants::NO_SESSION_MESSAGE;
use serde_json::Value;

use crate::error::ApiError;
use crate::response::SessionResponse;
use crate::state::AppState;

/// GET /api/auth/session - `{ user }` or `{ user: null }` with 401
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.lifecycle.current_session(&headers) {
        Some(session) => (
            StatusCode::OK,
            Json(SessionResponse {
                user: Some(session.user),
            }),
        )
            .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(SessionResponse { user: None })).into_response(),
    }
}

/// GET /api/auth/me - the raw user object
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    match state.lifecycle.require_session(&headers) {
        Ok(session) => Ok(Json(session.user)),
        Err(AuthError::Unauthorized) => Err(ApiError::Unauthorized(NO_SESSION_MESSAGE.to_string())),
        Err(other) => Err(state.api_error(other)),
    }
}
