//! Session cookie plumbing.
//!
//! The provider issues an access/refresh token pair; this module moves the
//! pair between `Cookie` headers, `Set-Cookie` headers, and request
//! rewrites when the guard rotates tokens mid-flight.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::api::state::SiteConfig;
use crate::provider::SessionTokens;

pub(crate) const ACCESS_COOKIE_NAME: &str = "sb-access-token";
pub(crate) const REFRESH_COOKIE_NAME: &str = "sb-refresh-token";

pub(crate) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

/// The cookie-borne token pair, if the caller presented an access token.
pub(crate) fn extract_tokens(headers: &HeaderMap) -> Option<SessionTokens> {
    let access_token = extract_cookie(headers, ACCESS_COOKIE_NAME)?;
    let refresh_token = extract_cookie(headers, REFRESH_COOKIE_NAME).unwrap_or_default();
    Some(SessionTokens {
        access_token,
        refresh_token,
    })
}

/// Build `Set-Cookie` values installing a session pair.
pub(crate) fn session_cookies(
    config: &SiteConfig,
    tokens: &SessionTokens,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    Ok(vec![
        cookie_value(
            config,
            ACCESS_COOKIE_NAME,
            &tokens.access_token,
            ttl_seconds,
        )?,
        cookie_value(
            config,
            REFRESH_COOKIE_NAME,
            &tokens.refresh_token,
            ttl_seconds,
        )?,
    ])
}

/// Build `Set-Cookie` values expiring both session cookies.
pub(crate) fn clear_session_cookies(
    config: &SiteConfig,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    Ok(vec![
        cookie_value(config, ACCESS_COOKIE_NAME, "", 0)?,
        cookie_value(config, REFRESH_COOKIE_NAME, "", 0)?,
    ])
}

/// Append session `Set-Cookie` headers onto an outbound header map.
pub(crate) fn append_set_cookies(headers: &mut HeaderMap, cookies: Vec<HeaderValue>) {
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
}

/// Rewrite the inbound `Cookie` header so downstream extractors observe a
/// rotated token pair.
pub(crate) fn merge_request_cookies(headers: &mut HeaderMap, tokens: &SessionTokens) {
    let mut pairs: Vec<(String, String)> = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(';')
                .filter_map(|pair| {
                    let trimmed = pair.trim();
                    let mut parts = trimmed.splitn(2, '=');
                    let key = parts.next()?.trim();
                    let val = parts.next()?.trim();
                    if key.is_empty() {
                        None
                    } else {
                        Some((key.to_string(), val.to_string()))
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    upsert(&mut pairs, ACCESS_COOKIE_NAME, &tokens.access_token);
    upsert(&mut pairs, REFRESH_COOKIE_NAME, &tokens.refresh_token);

    let merged = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    if let Ok(value) = HeaderValue::from_str(&merged) {
        headers.insert(COOKIE, value);
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some(entry) = pairs.iter_mut().find(|(key, _)| key == name) {
        entry.1 = value.to_string();
    } else {
        pairs.push((name.to_string(), value.to_string()));
    }
}

fn cookie_value(
    config: &SiteConfig,
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(site_url: &str) -> SiteConfig {
        SiteConfig::new(site_url.to_string())
    }

    fn tokens() -> SessionTokens {
        SessionTokens {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
        }
    }

    #[test]
    fn extract_cookie_finds_named_pair() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=abc; sb-refresh-token=def"),
        );
        assert_eq!(
            extract_cookie(&headers, ACCESS_COOKIE_NAME),
            Some("abc".to_string())
        );
        assert_eq!(
            extract_cookie(&headers, REFRESH_COOKIE_NAME),
            Some("def".to_string())
        );
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn extract_tokens_requires_access_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("sb-refresh-token=def"),
        );
        assert!(extract_tokens(&headers).is_none());

        headers.insert(
            COOKIE,
            HeaderValue::from_static("sb-access-token=abc"),
        );
        let extracted = extract_tokens(&headers).expect("tokens");
        assert_eq!(extracted.access_token, "abc");
        assert_eq!(extracted.refresh_token, "");
    }

    #[test]
    fn session_cookies_mark_secure_only_on_https() {
        let secure = session_cookies(&config("https://troupe.fr"), &tokens()).expect("cookies");
        assert!(secure.iter().all(|value| {
            value
                .to_str()
                .is_ok_and(|cookie| cookie.contains("; Secure") && cookie.contains("HttpOnly"))
        }));

        let plain = session_cookies(&config("http://localhost:3000"), &tokens()).expect("cookies");
        assert!(plain
            .iter()
            .all(|value| value.to_str().is_ok_and(|cookie| !cookie.contains("Secure"))));
    }

    #[test]
    fn clear_cookies_expire_immediately() {
        let cleared = clear_session_cookies(&config("http://localhost:3000")).expect("cookies");
        assert_eq!(cleared.len(), 2);
        assert!(cleared
            .iter()
            .all(|value| value.to_str().is_ok_and(|cookie| cookie.contains("Max-Age=0"))));
    }

    #[test]
    fn merge_request_cookies_replaces_and_preserves() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=old"),
        );
        merge_request_cookies(&mut headers, &tokens());

        let merged = headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(merged.contains("theme=dark"));
        assert!(merged.contains("sb-access-token=access-1"));
        assert!(merged.contains("sb-refresh-token=refresh-1"));
        assert!(!merged.contains("sb-access-token=old"));
    }
}
