//! Session guard.
//!
//! Runs once per request before routing. Excluded paths are never inspected;
//! everything else gets its cookie-borne session resolved through the
//! provider, with a single refresh attempt when the access token has gone
//! stale. A rotated pair is mirrored onto the inbound request (so downstream
//! extractors observe the fresh tokens) and onto the outbound response.
//! Unauthenticated requests to protected prefixes are redirected to sign-in.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::RegexSet;
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::handlers::auth::cookies;
use crate::api::state::{SiteConfig, SIGN_IN_PATH};
use crate::provider::{Provider, SessionTokens, SessionUser};

/// Paths the guard never inspects: static assets, image optimization, the
/// favicon, public files, and the payment webhook.
const EXCLUDED_PATH_PATTERNS: &[&str] = &[
    r"^/static/",
    r"^/images/",
    r"^/favicon\.ico$",
    r"^/public/",
    r"^/api/payments/webhook$",
];

pub struct GuardState {
    pub provider: Arc<dyn Provider>,
    pub config: Arc<SiteConfig>,
}

pub(crate) fn excluded(path: &str) -> bool {
    RegexSet::new(EXCLUDED_PATH_PATTERNS).map_or(false, |set| set.is_match(path))
}

pub async fn session_guard(
    State(state): State<Arc<GuardState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if excluded(&path) {
        return next.run(request).await;
    }

    let (user, rotated) = resolve_session(&state, request.headers()).await;

    if let Some(tokens) = rotated.as_ref() {
        cookies::merge_request_cookies(request.headers_mut(), tokens);
    }

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
        }
        None if state.config.is_protected(&path) => {
            debug!("Unauthenticated request to protected path: {path}");
            return Redirect::to(SIGN_IN_PATH).into_response();
        }
        None => {}
    }

    let mut response = next.run(request).await;
    if let Some(tokens) = rotated {
        match cookies::session_cookies(&state.config, &tokens) {
            Ok(values) => cookies::append_set_cookies(response.headers_mut(), values),
            Err(err) => error!("Failed to build session cookies: {err}"),
        }
    }
    response
}

async fn resolve_session(
    state: &GuardState,
    headers: &HeaderMap,
) -> (Option<SessionUser>, Option<SessionTokens>) {
    let Some(tokens) = cookies::extract_tokens(headers) else {
        return (None, None);
    };

    match state.provider.get_session(&tokens.access_token).await {
        Ok(user) => (Some(user), None),
        Err(err) => {
            debug!("Session lookup failed: {err}");
            if tokens.refresh_token.is_empty() {
                return (None, None);
            }
            // The provider may rotate tokens mid-check; try exactly once.
            match state.provider.refresh_session(&tokens.refresh_token).await {
                Ok(rotated) => match state.provider.get_session(&rotated.access_token).await {
                    Ok(user) => (Some(user), Some(rotated)),
                    Err(err) => {
                        debug!("Session lookup failed after refresh: {err}");
                        (None, None)
                    }
                },
                Err(err) => {
                    debug!("Session refresh failed: {err}");
                    (None, None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_webhook_paths_are_excluded() {
        assert!(excluded("/static/main.css"));
        assert!(excluded("/images/affiche.jpg"));
        assert!(excluded("/favicon.ico"));
        assert!(excluded("/public/dossier-presse.pdf"));
        assert!(excluded("/api/payments/webhook"));
    }

    #[test]
    fn page_paths_are_inspected() {
        assert!(!excluded("/"));
        assert!(!excluded("/espace-membres"));
        assert!(!excluded("/sign-in"));
        assert!(!excluded("/api/payments/webhooks-doc"));
        assert!(!excluded("/staticky"));
    }
}
