use std::sync::Arc;

use portal_core::{AuthError, SessionLifecycle};
use portal_shared::AppConfig;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub lifecycle: Arc<SessionLifecycle>,
}

impl AppState {
    pub fn new(config: AppConfig, lifecycle: SessionLifecycle) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle: Arc::new(lifecycle),
        }
    }

    /// Maps a core error, exposing internal detail only in development.
    pub fn api_error(&self, err: AuthError) -> ApiError {
        ApiError::from_auth(err, self.config.app.is_development())
    }
}
