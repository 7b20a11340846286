//! Client Events
//!
//! Outcomes sent from background fetches to the view models.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Session endpoint answered 200 with a user
    SessionLoaded(Value),
    /// Any non-200 answer
    SessionUnauthenticated,
    /// The request never completed
    SessionFailed(String),
}
