//! Identity provider port

use async_trait::async_trait;
use portal_security::SessionRecord;

use crate::error::AuthError;

/// Exchanges an authorization code for the signed-in user's session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Failures surface as [`AuthError::Upstream`].
    async fn exchange_code(&self, code: &str) -> Result<SessionRecord, AuthError>;
}
