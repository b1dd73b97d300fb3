//! Token extraction from the links sent in reset and verification emails.
//!
//! Links in the wild carry the token as `?token=`, as a `#token=` fragment, or
//! as the last path segment (`/reset-password/<token>`). A bare token pasted
//! without a URL is accepted as-is.

use url::{form_urlencoded, Url};

const RELATIVE_BASE: &str = "http://localhost/";
const TOKEN_ROUTES: [&str; 2] = ["reset-password", "verify-email"];

/// Returns the token carried by `link`, or `None` when it is missing or blank.
#[must_use]
pub fn token_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(_) if link.contains(|c| matches!(c, '/' | '?' | '#')) => {
            Url::parse(RELATIVE_BASE).ok()?.join(link).ok()?
        }
        Err(_) => return normalize_token(link),
    };

    token_from_query(&url)
        .or_else(|| token_from_fragment(&url))
        .or_else(|| token_from_path(&url))
}

fn token_from_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .and_then(|(_, value)| normalize_token(&value))
}

fn token_from_fragment(url: &Url) -> Option<String> {
    let fragment = url.fragment()?;
    form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "token")
        .and_then(|(_, value)| normalize_token(&value))
}

fn token_from_path(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    let route = segments
        .iter()
        .position(|segment| TOKEN_ROUTES.contains(segment))?;
    segments
        .get(route + 1)
        .and_then(|segment| normalize_token(segment))
}

fn normalize_token(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
