// ============================================================================
// Portal Core - Session Lifecycle
// File: crates/portal-core/src/services/lifecycle.rs
// ============================================================================
//! Login redirect, callback, logout, and current-session access.
//!
//! `ANONYMOUS -> LOGIN_REDIRECTED -> AUTHENTICATED -> ANONYMOUS`. This is the only
//! component that creates or destroys the session and state cookies.

use std::sync::Arc;

use chrono::Utc;
use http::{HeaderMap, HeaderValue};
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope};
use portal_security::nonce::generate_nonce;
use portal_security::redirect::sanitize_return_to;
use portal_security::{LoginState, SessionCodec, SessionRecord, StateSigner};
use portal_shared::constants::LOGIN_SCOPES;
use portal_shared::utils::mask_email;
use portal_shared::AppConfig;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::error::AuthError;
use crate::providers::IdentityProvider;
use crate::services::cookies::{clear_cookie, read_cookie, set_cookie};
use crate::services::session_store::SessionStore;

/// Query parameters the provider appends to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug)]
pub struct LoginRedirect {
    pub url: String,
    pub nonce: String,
    /// Sets the state cookie carrying `nonce`.
    pub cookie: HeaderValue,
}

#[derive(Debug)]
pub struct CallbackOutcome {
    pub session: SessionRecord,
    pub return_to: String,
    /// Session cookie first, then the state-cookie removal.
    pub cookies: Vec<HeaderValue>,
}

#[derive(Debug)]
pub struct LogoutRedirect {
    pub url: String,
    /// Removal of the session cookie; must travel in the same response as `url`.
    pub cookie: HeaderValue,
}

pub struct SessionLifecycle {
    store: SessionStore,
    signer: StateSigner,
    provider: Arc<dyn IdentityProvider>,
    base_url: Url,
    base_url_raw: String,
    issuer_url: String,
    callback_url: String,
    client_id: String,
    audience: Option<String>,
    state_cookie_name: String,
    state_ttl_seconds: i64,
    session_ttl_seconds: i64,
    secure_cookie: bool,
}

impl SessionLifecycle {
    pub fn new(config: &AppConfig, provider: Arc<dyn IdentityProvider>) -> Result<Self, AuthError> {
        let base_url = Url::parse(&config.app.base_url)
            .map_err(|e| AuthError::Configuration(format!("Invalid base URL: {}", e)))?;

        Ok(Self {
            store: SessionStore::new(config.session.cookie_name.clone()),
            signer: StateSigner::new(&config.auth.secret),
            provider,
            base_url,
            base_url_raw: config.app.base_url_trimmed().to_string(),
            issuer_url: config.auth.issuer_url(),
            callback_url: config.callback_url(),
            client_id: config.auth.client_id.clone(),
            audience: config.auth.audience.clone().filter(|a| !a.is_empty()),
            state_cookie_name: config.session.state_cookie_name.clone(),
            state_ttl_seconds: config.auth.state_ttl_seconds,
            session_ttl_seconds: config.session.ttl_seconds,
            secure_cookie: config.session.secure_cookie,
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn current_session(&self, headers: &HeaderMap) -> Option<SessionRecord> {
        self.store.get_session(headers)
    }

    pub fn require_session(&self, headers: &HeaderMap) -> Result<SessionRecord, AuthError> {
        self.store.require_session(headers)
    }

    pub fn initiate_login(&self, return_to: Option<&str>) -> Result<LoginRedirect, AuthError> {
        self.initiate_login_at(return_to, Utc::now().timestamp())
    }

    /// Builds the `/authorize` redirect. `now` is in epoch seconds.
    pub fn initiate_login_at(
        &self,
        return_to: Option<&str>,
        now: i64,
    ) -> Result<LoginRedirect, AuthError> {
        let nonce = generate_nonce();
        let state = self.signer.sign(&LoginState {
            return_to: sanitize_return_to(return_to, &self.base_url),
            nonce: nonce.clone(),
            iat: now,
        })?;

        let auth_url = AuthUrl::new(format!("{}/authorize", self.issuer_url))
            .map_err(|e| AuthError::Configuration(format!("Invalid authorize URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(self.callback_url.clone())
            .map_err(|e| AuthError::Configuration(format!("Invalid callback URL: {}", e)))?;
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_auth_uri(auth_url)
            .set_redirect_uri(redirect_url);

        let mut request = client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(LOGIN_SCOPES.iter().map(|scope| Scope::new(scope.to_string())));
        if let Some(audience) = &self.audience {
            request = request.add_extra_param("audience", audience.clone());
        }
        let (url, _) = request.url();

        let cookie = set_cookie(
            &self.state_cookie_name,
            &nonce,
            self.state_ttl_seconds,
            self.secure_cookie,
        )?;

        Ok(LoginRedirect {
            url: url.to_string(),
            nonce,
            cookie,
        })
    }

    pub async fn handle_callback(
        &self,
        params: &CallbackParams,
        headers: &HeaderMap,
    ) -> Result<CallbackOutcome, AuthError> {
        self.handle_callback_at(params, headers, Utc::now().timestamp_millis())
            .await
    }

    /// `now_ms` is in epoch milliseconds.
    pub async fn handle_callback_at(
        &self,
        params: &CallbackParams,
        headers: &HeaderMap,
        now_ms: i64,
    ) -> Result<CallbackOutcome, AuthError> {
        if let Some(error) = &params.error {
            warn!(
                "Provider returned error on callback: {} ({})",
                error,
                params.error_description.as_deref().unwrap_or("no description")
            );
            return Err(AuthError::Upstream(format!(
                "{}: {}",
                error,
                params.error_description.as_deref().unwrap_or_default()
            )));
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AuthError::InvalidState("missing authorization code".to_string()))?;
        let token = params
            .state
            .as_deref()
            .ok_or_else(|| AuthError::InvalidState("missing state".to_string()))?;
        let nonce = read_cookie(headers, &self.state_cookie_name).unwrap_or_default();

        let state = self
            .signer
            .verify(token, &nonce, now_ms / 1000, self.state_ttl_seconds)
            .map_err(|e| {
                warn!("Rejected login state: {}", e);
                AuthError::from(e)
            })?;

        let mut session = self.provider.exchange_code(code).await?;
        if session.expires_at.is_none() {
            session.expires_at = Some(now_ms + self.session_ttl_seconds * 1000);
        }

        let value = SessionCodec::encode(&session)
            .map_err(|e| AuthError::Internal(format!("Session encoding failed: {}", e)))?;
        let cookie_ttl = session
            .expires_at
            .map(|expires_at| ((expires_at - now_ms) / 1000).max(0))
            .unwrap_or(self.session_ttl_seconds);

        let cookies = vec![
            set_cookie(self.store.cookie_name(), &value, cookie_ttl, self.secure_cookie)?,
            clear_cookie(&self.state_cookie_name, self.secure_cookie)?,
        ];

        info!(
            "Session established for {}",
            session.email().map(mask_email).unwrap_or_else(|| "unknown user".to_string())
        );

        Ok(CallbackOutcome {
            session,
            return_to: sanitize_return_to(Some(&state.return_to), &self.base_url),
            cookies,
        })
    }

    pub fn logout(&self) -> Result<LogoutRedirect, AuthError> {
        let cookie = clear_cookie(self.store.cookie_name(), self.secure_cookie)?;
        let url = Url::parse_with_params(
            &format!("{}/v2/logout", self.issuer_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("returnTo", self.base_url_raw.as_str()),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("Invalid logout URL: {}", e)))?;

        Ok(LogoutRedirect {
            url: url.to_string(),
            cookie,
        })
    }
}
