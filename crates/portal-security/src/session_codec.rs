//! Session cookie value codec.
//!
//! The cookie value is the plain JSON form of [`SessionRecord`]. There is no
//! signing or encryption here; the cookie relies on `HttpOnly` + `Secure` transport.

use thiserror::Error;

use crate::session::SessionRecord;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed session payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Session payload has no user")]
    MissingUser,
}

pub struct SessionCodec;

impl SessionCodec {
    pub fn encode(session: &SessionRecord) -> Result<String, serde_json::Error> {
        serde_json::to_string(session)
    }

    pub fn decode(value: &str) -> Result<SessionRecord, DecodeError> {
        let session: SessionRecord = serde_json::from_str(value)?;
        if session.user.is_null() {
            return Err(DecodeError::MissingUser);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let sessions = [
            SessionRecord::new(json!({ "email": "a@b.com" })),
            SessionRecord {
                user: json!({ "name": "Ana", "sub": "auth0|42", "roles": ["admin"] }),
                expires_at: Some(1_700_000_000_000),
            },
        ];
        for session in sessions {
            let encoded = SessionCodec::encode(&session).unwrap();
            assert_eq!(SessionCodec::decode(&encoded).unwrap(), session);
        }
    }

    #[test]
    fn test_encode_omits_missing_expiry() {
        let encoded = SessionCodec::encode(&SessionRecord::new(json!({ "email": "a@b.com" }))).unwrap();
        assert_eq!(encoded, r#"{"user":{"email":"a@b.com"}}"#);
    }

    #[test]
    fn test_decode_malformed() {
        for raw in ["", "not json", "{", r#"{"expires_at": 5}"#, r#"{"user": {}, "expires_at": "soon"}"#] {
            assert!(
                matches!(SessionCodec::decode(raw), Err(DecodeError::Malformed(_))),
                "expected malformed for {raw:?}"
            );
        }
    }

    #[test]
    fn test_decode_null_user() {
        assert!(matches!(
            SessionCodec::decode(r#"{"user": null}"#),
            Err(DecodeError::MissingUser)
        ));
    }
}
