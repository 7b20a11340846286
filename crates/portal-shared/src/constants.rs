//! Application-wide constants

pub const SESSION_COOKIE_NAME: &str = "auth0_session";
pub const STATE_COOKIE_NAME: &str = "auth0_state";
pub const DEFAULT_CALLBACK_PATH: &str = "/auth/callback";
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 86400;
pub const DEFAULT_STATE_TTL_SECONDS: i64 = 600;
pub const LOGIN_SCOPES: [&str; 3] = ["openid", "profile", "email"];
pub const SESSION_ENDPOINT: &str = "/api/auth/session";
pub const NO_SESSION_MESSAGE: &str = "No session found";
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";
