// ============================================================================
// Portal Security - Signed login state
// File: crates/portal-security/src/state.rs
// ============================================================================
//! Signed `state` parameter for the authorization redirect.
//!
//! Wire form: `base64url(json) "." base64url(HMAC-SHA256(secret, base64url(json)))`.
//! The payload carries the post-login destination, a nonce that is also stored in
//! a browser cookie, and the issue time in epoch seconds.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::nonce::nonce_matches;

type HmacSha256 = Hmac<Sha256>;

/// Allowed clock skew for states issued "in the future".
const MAX_FUTURE_SKEW_SECONDS: i64 = 60;

#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("Malformed state: {0}")]
    Malformed(String),
    #[error("State signature mismatch")]
    BadSignature,
    #[error("State expired")]
    Expired,
    #[error("State nonce mismatch")]
    NonceMismatch,
    #[error("State signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginState {
    #[serde(rename = "returnTo")]
    pub return_to: String,
    pub nonce: String,
    pub iat: i64,
}

#[derive(Clone)]
pub struct StateSigner {
    secret: Vec<u8>,
}

impl StateSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    pub fn sign(&self, state: &LoginState) -> Result<String, StateError> {
        let json = serde_json::to_vec(state).map_err(|e| StateError::Signing(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(payload.as_bytes())?.finalize().into_bytes());
        Ok(format!("{}.{}", payload, signature))
    }

    /// Checks signature, nonce binding, and age, in that order.
    pub fn verify(
        &self,
        token: &str,
        expected_nonce: &str,
        now: i64,
        ttl_seconds: i64,
    ) -> Result<LoginState, StateError> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| StateError::Malformed("missing signature".to_string()))?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| StateError::BadSignature)?;
        self.mac(payload.as_bytes())?
            .verify_slice(&signature)
            .map_err(|_| StateError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| StateError::Malformed(e.to_string()))?;
        let state: LoginState =
            serde_json::from_slice(&json).map_err(|e| StateError::Malformed(e.to_string()))?;

        if !nonce_matches(&state.nonce, expected_nonce) {
            return Err(StateError::NonceMismatch);
        }

        if now - state.iat > ttl_seconds || state.iat - now > MAX_FUTURE_SKEW_SECONDS {
            return Err(StateError::Expired);
        }

        Ok(state)
    }

    fn mac(&self, message: &[u8]) -> Result<HmacSha256, StateError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StateError::Signing(format!("HMAC error: {}", e)))?;
        mac.update(message);
        Ok(mac)
    }
}
