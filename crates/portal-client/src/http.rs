// ============================================================================
// Portal Client - API Client
// File: crates/portal-client/src/http.rs
// ============================================================================
//! reqwest wrapper bound to the portal's base URL.
//!
//! Every call goes through [`ApiClient::intercept`], which turns a 401 into
//! [`ClientError::Unauthorized`] carrying the login URL for the failed path.

use portal_shared::constants::SESSION_ENDPOINT;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

/// Result of asking the server for the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionFetch {
    Authenticated(Value),
    Unauthenticated,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    user: Option<Value>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            session_cookie: None,
        })
    }

    /// Forwards `cookie` (a `name=value` pair) on every request.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/login?returnTo=<path>`
    pub fn login_url(&self, return_to: &str) -> Result<String, ClientError> {
        let url = Url::parse_with_params(&self.url("/login"), &[("returnTo", return_to)])?;
        Ok(url.to_string())
    }

    async fn send(&self, path: &str) -> Result<Response, ClientError> {
        let mut request = self.http.get(self.url(path));
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, cookie.as_str());
        }
        debug!("GET {}", path);
        Ok(request.send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response, ClientError> {
        let response = self.send(path).await?;
        self.intercept(path, response).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.get(path).await?;
        Ok(response.json::<T>().await?)
    }

    /// Maps 401 to a login redirect and other failures to [`ClientError::Status`].
    async fn intercept(&self, path: &str, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Unauthorized response for {}", path);
            return Err(ClientError::Unauthorized {
                login_url: self.login_url(path)?,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Any non-200 answer means no session; only transport failures are errors.
    pub async fn fetch_session(&self) -> Result<SessionFetch, ClientError> {
        let response = self.send(SESSION_ENDPOINT).await?;
        if response.status() != StatusCode::OK {
            debug!("Session endpoint answered {}", response.status());
            return Ok(SessionFetch::Unauthenticated);
        }

        let body: SessionBody = response.json().await?;
        Ok(match body.user {
            Some(user) if !user.is_null() => SessionFetch::Authenticated(user),
            _ => SessionFetch::Unauthenticated,
        })
    }
}
