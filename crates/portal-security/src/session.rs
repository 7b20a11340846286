//! Session record carried by the session cookie

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Provider profile. Only its presence is checked.
    pub user: Value,
    /// Absolute expiry in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl SessionRecord {
    pub fn new(user: Value) -> Self {
        Self { user, expires_at: None }
    }

    pub fn with_ttl(user: Value, ttl_seconds: i64, now_ms: i64) -> Self {
        Self {
            user,
            expires_at: Some(now_ms + ttl_seconds * 1000),
        }
    }

    /// Valid iff there is no expiry or the expiry is strictly after `now_ms`.
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now_ms)
    }

    pub fn email(&self) -> Option<&str> {
        self.user.get("email").and_then(Value::as_str)
    }
}
