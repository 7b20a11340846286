// ============================================================================
// Portal Infrastructure - Auth0 provider
// File: crates/portal-infrastructure/src/auth0/provider.rs
// ============================================================================
//! Authorization-code exchange against an Auth0 tenant.
//!
//! 1. `POST {issuer}/oauth/token` with the code and client credentials.
//! 2. `GET {issuer}/userinfo` with the returned access token.
//!
//! The id token is not verified; the profile comes from `/userinfo` instead.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use portal_core::{AuthError, IdentityProvider, SessionRecord};
use portal_shared::AppConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

const REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Clone)]
pub struct Auth0Provider {
    client: Client,
    issuer_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl Auth0Provider {
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            issuer_url: config.auth.issuer_url(),
            client_id: config.auth.client_id.clone(),
            client_secret: config.auth.client_secret.clone(),
            redirect_uri: config.callback_url(),
        }
    }

    async fn request_token(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let request = TokenRequest {
            grant_type: "authorization_code",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code,
            redirect_uri: &self.redirect_uri,
        };

        let response = self
            .client
            .post(format!("{}/oauth/token", self.issuer_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Token endpoint error: {} - {}", status, body);
            return Err(AuthError::Upstream(format!("Token endpoint returned {}", status)));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Upstream(format!("Invalid token response: {}", e)))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<Value, AuthError> {
        let response = self
            .client
            .get(format!("{}/userinfo", self.issuer_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Userinfo endpoint error: {}", status);
            return Err(AuthError::Upstream(format!("Userinfo endpoint returned {}", status)));
        }

        let user: Value = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("Invalid userinfo response: {}", e)))?;
        if !user.is_object() {
            return Err(AuthError::Upstream("Userinfo response is not an object".to_string()));
        }
        Ok(user)
    }
}

#[async_trait]
impl IdentityProvider for Auth0Provider {
    async fn exchange_code(&self, code: &str) -> Result<SessionRecord, AuthError> {
        let token = self.request_token(code).await?;
        let user = self.fetch_user(&token.access_token).await?;
        debug!("Fetched profile for subject {:?}", user.get("sub"));

        let expires_at = token
            .expires_in
            .filter(|seconds| *seconds > 0)
            .map(|seconds| Utc::now().timestamp_millis() + seconds * 1000);

        Ok(SessionRecord { user, expires_at })
    }
}
