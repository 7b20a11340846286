//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    DEFAULT_CALLBACK_PATH, DEFAULT_SESSION_TTL_SECONDS, DEFAULT_STATE_TTL_SECONDS,
    SESSION_COOKIE_NAME, STATE_COOKIE_NAME,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub app: AppSettings,
    #[validate(nested)]
    pub auth: AuthSettings,
    #[validate(nested)]
    pub session: SessionSettings,
    #[serde(default)]
    pub email: Option<EmailSettings>,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Public origin of the application, e.g. `https://app.example.com`.
    #[validate(url)]
    pub base_url: String,
    #[serde(default)]
    pub log_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AuthSettings {
    /// Provider tenant domain, with or without scheme.
    #[validate(length(min = 1))]
    pub domain: String,
    #[validate(length(min = 1))]
    pub client_id: String,
    #[validate(length(min = 1))]
    pub client_secret: String,
    #[serde(default)]
    pub audience: Option<String>,
    /// HMAC key for the login `state` parameter, at least 32 bytes.
    #[validate(length(min = 32))]
    pub secret: String,
    pub callback_path: String,
    #[validate(range(min = 1))]
    pub state_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct SessionSettings {
    #[validate(length(min = 1))]
    pub cookie_name: String,
    #[validate(length(min = 1))]
    pub state_cookie_name: String,
    #[validate(range(min = 1))]
    pub ttl_seconds: i64,
    pub secure_cookie: bool,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct EmailSettings {
    #[validate(length(min = 1))]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[validate(length(min = 3))]
    pub from_address: String,
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            state_cookie_name: STATE_COOKIE_NAME.to_string(),
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookie: true,
        }
    }
}

impl AuthSettings {
    /// Provider base URL without a trailing slash.
    pub fn issuer_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }
}

impl AppSettings {
    pub fn is_development(&self) -> bool {
        self.env.eq_ignore_ascii_case("development")
    }

    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl AppConfig {
    /// Layered load: defaults, `config/default`, `config/{APP_ENV}`, `__`-separated
    /// environment, then the flat `AUTH0_*` variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", env.clone())?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 3000)?
            .set_default("app.name", "portal-server")?
            .set_default("auth.callback_path", DEFAULT_CALLBACK_PATH)?
            .set_default("auth.state_ttl_seconds", DEFAULT_STATE_TTL_SECONDS)?
            .set_default("session.cookie_name", SESSION_COOKIE_NAME)?
            .set_default("session.state_cookie_name", STATE_COOKIE_NAME)?
            .set_default("session.ttl_seconds", DEFAULT_SESSION_TTL_SECONDS)?
            .set_default("session.secure_cookie", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .set_override_option("auth.domain", env_var("AUTH0_DOMAIN"))?
            .set_override_option("auth.client_id", env_var("AUTH0_CLIENT_ID"))?
            .set_override_option("auth.client_secret", env_var("AUTH0_CLIENT_SECRET"))?
            .set_override_option("auth.audience", env_var("AUTH0_AUDIENCE"))?
            .set_override_option("auth.secret", env_var("AUTH0_SECRET"))?
            .set_override_option("app.base_url", env_var("AUTH0_BASE_URL"))?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Validates every section, including the optional email block.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if let Some(email) = &self.email {
            email.validate()?;
        }
        Ok(())
    }

    /// Absolute redirect URI registered with the provider.
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.app.base_url_trimmed(), self.auth.callback_path)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
