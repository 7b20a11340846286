//! Authentication errors

use portal_security::StateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No valid session. Raised only by the hard-fail accessors.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid login state: {0}")]
    InvalidState(String),

    #[error("Identity provider error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StateError> for AuthError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Signing(msg) => AuthError::Internal(msg),
            other => AuthError::InvalidState(other.to_string()),
        }
    }
}
