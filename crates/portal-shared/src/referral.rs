//! Referral link generation and parsing.
//!
//! A referral code is the referring user's id, base64url-encoded without padding,
//! carried in the `ref` query parameter of the signup URL.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use url::Url;

pub const REFERRAL_PARAM: &str = "ref";
pub const SIGNUP_PATH: &str = "/signup";

pub fn referral_code(user_id: &str) -> String {
    URL_SAFE_NO_PAD.encode(user_id.as_bytes())
}

pub fn decode_referral_code(code: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(code.trim()).ok()?;
    String::from_utf8(bytes).ok().filter(|id| !id.is_empty())
}

pub fn referral_link(base_url: &str, user_id: &str) -> String {
    format!(
        "{}{}?{}={}",
        base_url.trim_end_matches('/'),
        SIGNUP_PATH,
        REFERRAL_PARAM,
        referral_code(user_id)
    )
}

/// Returns the referring user id carried by `link`, if any.
pub fn parse_referral_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == REFERRAL_PARAM)
        .and_then(|(_, code)| decode_referral_code(&code))
}
