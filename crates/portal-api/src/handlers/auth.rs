// ============================================================================
// Portal API - Auth Handlers
// File: crates/portal-api/src/handlers/auth.rs
// ============================================================================
//! Login, callback, and logout redirects

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use portal_core::services::CallbackParams;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::response::found;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

/// Login handler - GET /login?returnTo=<url>
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Response, ApiError> {
    let redirect = state
        .lifecycle
        .initiate_login(query.return_to.as_deref())
        .map_err(|e| state.api_error(e))?;

    found(&redirect.url, [redirect.cookie])
}

/// Callback handler - GET /auth/callback?code=..&state=..
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let outcome = state
        .lifecycle
        .handle_callback(&params, &headers)
        .await
        .map_err(|e| state.api_error(e))?;

    found(&outcome.return_to, outcome.cookies)
}

/// Logout handler - GET /logout
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let redirect = state.lifecycle.logout().map_err(|e| state.api_error(e))?;
    info!("Session cleared, redirecting to provider logout");
    found(&redirect.url, [redirect.cookie])
}
