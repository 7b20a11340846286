//! Session services

pub mod cookies;
pub mod session_store;
pub mod lifecycle;

pub use lifecycle::{CallbackOutcome, CallbackParams, LoginRedirect, LogoutRedirect, SessionLifecycle};
pub use session_store::SessionStore;
