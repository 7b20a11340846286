//! # Portal Core
//! 
//! Session store, session lifecycle, and the identity provider port.

pub mod services;
pub mod providers;
pub mod error;

pub use error::AuthError;
pub use portal_security::SessionRecord;
pub use providers::IdentityProvider;
pub use services::{SessionLifecycle, SessionStore};
