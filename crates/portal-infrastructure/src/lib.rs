//! # Portal Infrastructure
//! 
//! Adapters: the Auth0 identity provider and the SMTP mailer.

pub mod auth0;
pub mod mail;

pub use auth0::Auth0Provider;
pub use mail::{MailError, Mailer};
