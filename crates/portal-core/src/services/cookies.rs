//! Cookie header reading and `Set-Cookie` construction.
//!
//! Values are percent-encoded on the wire so JSON payloads survive cookie syntax.

use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use http::header::{HeaderMap, HeaderValue, COOKIE};

use crate::error::AuthError;

/// Returns the decoded value of the first cookie called `name`.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse_encoded(raw))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// `HttpOnly; SameSite=Lax; Path=/` cookie living for `max_age_seconds`.
pub fn set_cookie(
    name: &str,
    value: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, AuthError> {
    let cookie = Cookie::build((name.to_string(), value.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .build();
    to_header(&cookie)
}

/// Expired, empty cookie that makes the browser drop `name`.
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, AuthError> {
    let mut cookie = Cookie::build((name.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    to_header(&cookie)
}

fn to_header(cookie: &Cookie<'_>) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(&cookie.encoded().to_string())
        .map_err(|e| AuthError::Internal(format!("Invalid cookie header: {}", e)))
}
