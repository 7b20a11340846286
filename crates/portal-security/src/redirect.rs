//! Post-login redirect sanitising.

use url::Url;

const FALLBACK_PATH: &str = "/";

/// Reduces `return_to` to a same-origin destination. Relative paths with a single
/// leading slash pass through; absolute URLs are kept only when their origin equals
/// `base_url`'s, and are returned in path form. Everything else becomes `/`.
pub fn sanitize_return_to(return_to: Option<&str>, base_url: &Url) -> String {
    let Some(raw) = return_to.map(str::trim).filter(|r| !r.is_empty()) else {
        return FALLBACK_PATH.to_string();
    };

    if raw.starts_with('/') {
        if raw.starts_with("//") || raw.contains('\\') || raw.chars().any(char::is_control) {
            return FALLBACK_PATH.to_string();
        }
        return raw.to_string();
    }

    match Url::parse(raw) {
        Ok(url) if url.origin() == base_url.origin() => {
            let mut path = url.path().to_string();
            if let Some(query) = url.query() {
                path.push('?');
                path.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                path.push('#');
                path.push_str(fragment);
            }
            path
        }
        _ => FALLBACK_PATH.to_string(),
    }
}
