// ============================================================================
// Portal Core - Session Store
// File: crates/portal-core/src/services/session_store.rs
// ============================================================================
//! The single reader of the session cookie.
//!
//! Missing, malformed, and expired cookies all collapse to `None`. Only
//! [`SessionStore::require_session`] turns that into an error.

use chrono::Utc;
use http::HeaderMap;
use portal_security::{SessionCodec, SessionRecord};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::services::cookies::read_cookie;

#[derive(Debug, Clone)]
pub struct SessionStore {
    cookie_name: String,
}

impl SessionStore {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn get_session(&self, headers: &HeaderMap) -> Option<SessionRecord> {
        self.get_session_at(headers, Utc::now().timestamp_millis())
    }

    pub fn get_session_at(&self, headers: &HeaderMap, now_ms: i64) -> Option<SessionRecord> {
        let raw = read_cookie(headers, &self.cookie_name)?;

        let session = match SessionCodec::decode(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring undecodable session cookie: {}", e);
                return None;
            }
        };

        if !session.is_valid_at(now_ms) {
            debug!("Session expired at {:?}", session.expires_at);
            return None;
        }

        Some(session)
    }

    pub fn require_session(&self, headers: &HeaderMap) -> Result<SessionRecord, AuthError> {
        self.get_session(headers).ok_or(AuthError::Unauthorized)
    }

    pub fn require_session_at(
        &self,
        headers: &HeaderMap,
        now_ms: i64,
    ) -> Result<SessionRecord, AuthError> {
        self.get_session_at(headers, now_ms).ok_or(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cookies::set_cookie;
    use http::header::COOKIE;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    fn store() -> SessionStore {
        SessionStore::new("auth0_session")
    }

    fn with_cookie(json: &str) -> HeaderMap {
        let set = set_cookie("auth0_session", json, 60, true).unwrap();
        let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, pair.parse().unwrap());
        headers
    }

    #[test]
    fn test_no_cookie_is_absent() {
        assert_eq!(store().get_session_at(&HeaderMap::new(), NOW), None);
    }

    #[test]
    fn test_session_without_expiry_is_returned() {
        let headers = with_cookie(r#"{"user":{"email":"a@b.com"}}"#);
        let session = store().get_session_at(&headers, NOW).unwrap();
        assert_eq!(session.user, json!({ "email": "a@b.com" }));
        assert_eq!(session.expires_at, None);

        // The wall-clock variant agrees for records without expiry.
        assert_eq!(store().get_session(&headers), Some(session));
    }

    #[test]
    fn test_expired_session_is_absent() {
        for expires_at in [NOW - 1_000, NOW] {
            let raw = json!({ "user": { "email": "a@b.com" }, "expires_at": expires_at }).to_string();
            assert_eq!(store().get_session_at(&with_cookie(&raw), NOW), None);
        }
    }

    #[test]
    fn test_future_expiry_is_returned() {
        let raw = json!({ "user": { "email": "a@b.com" }, "expires_at": NOW + 1 }).to_string();
        assert!(store().get_session_at(&with_cookie(&raw), NOW).is_some());
    }

    #[test]
    fn test_malformed_cookie_is_absent() {
        for raw in ["not-json", "{}", r#"{"user":null}"#, r#"{"user":{},"expires_at":"x"}"#] {
            assert_eq!(store().get_session_at(&with_cookie(raw), NOW), None, "{raw}");
        }
    }

    #[test]
    fn test_require_session_mirrors_get_session() {
        let valid = with_cookie(r#"{"user":{"sub":"auth0|1"}}"#);
        let expired = with_cookie(&json!({ "user": {}, "expires_at": NOW - 1 }).to_string());

        for headers in [valid, expired, HeaderMap::new()] {
            let got = store().get_session_at(&headers, NOW);
            match store().require_session_at(&headers, NOW) {
                Ok(session) => assert_eq!(Some(session), got),
                Err(AuthError::Unauthorized) => assert_eq!(got, None),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_other_cookie_name_ignored() {
        let headers = with_cookie(r#"{"user":{"email":"a@b.com"}}"#);
        assert_eq!(SessionStore::new("other").get_session_at(&headers, NOW), None);
    }
}
