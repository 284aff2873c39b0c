//! Completes provider-redirect sign-ins.
//!
//! The provider sends the browser back with an authorization code; exchanging
//! it yields a session pair. Exchange failures are logged, never surfaced:
//! the browser is forwarded either way.

use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::cookies;
use super::types::CallbackParams;
use crate::api::state::{SiteConfig, MEMBERS_PATH};
use crate::provider::Provider;

#[utoipa::path(
    get,
    path = "/auth/callback",
    params(CallbackParams),
    responses(
        (status = 303, description = "Forwarded to the requested or default destination")
    ),
    tag = "auth"
)]
#[instrument(skip(provider, config))]
pub async fn callback(
    provider: Extension<Arc<dyn Provider>>,
    config: Extension<Arc<SiteConfig>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let mut headers = HeaderMap::new();

    if let Some(code) = params.code.as_deref() {
        match provider.exchange_code(code).await {
            Ok(tokens) => match cookies::session_cookies(&config, &tokens) {
                Ok(values) => cookies::append_set_cookies(&mut headers, values),
                Err(err) => error!("Failed to build session cookies: {err}"),
            },
            Err(err) => error!("Failed to exchange authorization code: {err}"),
        }
    }

    let destination = params
        .redirect_to
        .unwrap_or_else(|| MEMBERS_PATH.to_string());
    (headers, Redirect::to(&destination)).into_response()
}
