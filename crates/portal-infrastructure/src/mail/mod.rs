//! Outgoing email

mod mailer;

pub use mailer::{MailError, Mailer};
