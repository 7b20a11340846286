use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portal_core::AuthError;
use portal_shared::constants::GENERIC_ERROR_MESSAGE;
use thiserror::Error;

use crate::response::ErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream error: {detail}")]
    UpstreamError { detail: String, expose: bool },

    #[error("Internal error: {detail}")]
    InternalError { detail: String, expose: bool },
}

impl ApiError {
    pub fn from_auth(err: AuthError, expose: bool) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized("Unauthorized".to_string()),
            AuthError::InvalidState(_) => ApiError::Unauthorized("Invalid login state".to_string()),
            AuthError::Upstream(detail) => ApiError::UpstreamError { detail, expose },
            other => ApiError::InternalError {
                detail: other.to_string(),
                expose,
            },
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::InternalError {
            detail: detail.into(),
            expose: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorBody::new(msg))
            }
            ApiError::UpstreamError { detail, expose } => {
                tracing::error!("Upstream error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::generic(detail, expose))
            }
            ApiError::InternalError { detail, expose } => {
                tracing::error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::generic(detail, expose))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl ErrorBody {
    fn generic(detail: String, expose: bool) -> Self {
        Self {
            error: GENERIC_ERROR_MESSAGE.to_string(),
            detail: expose.then_some(detail),
        }
    }
}
