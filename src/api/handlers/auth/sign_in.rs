//! Password sign-in and sign-out.

use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tracing::{error, instrument};

use super::cookies;
use super::redirect::{encoded_redirect, MessageKind};
use super::types::SignInForm;
use crate::api::state::{SiteConfig, MEMBERS_PATH, SIGN_IN_PATH};
use crate::provider::Provider;

#[utoipa::path(
    post,
    path = "/sign-in",
    request_body(content = SignInForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Session cookies installed, or an error redirect")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn sign_in(
    provider: Extension<Arc<dyn Provider>>,
    config: Extension<Arc<SiteConfig>>,
    payload: Option<Form<SignInForm>>,
) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();

    let tokens = match provider.sign_in(&form.email, &form.password).await {
        Ok(tokens) => tokens,
        Err(err) => {
            error!("Sign-in refused by provider: {err}");
            return encoded_redirect(MessageKind::Error, SIGN_IN_PATH, &err.to_string())
                .into_response();
        }
    };

    let mut headers = HeaderMap::new();
    match cookies::session_cookies(&config, &tokens) {
        Ok(values) => cookies::append_set_cookies(&mut headers, values),
        Err(err) => error!("Failed to build session cookies: {err}"),
    }
    (headers, Redirect::to(MEMBERS_PATH)).into_response()
}

#[utoipa::path(
    post,
    path = "/sign-out",
    responses(
        (status = 303, description = "Session invalidated and cookies cleared")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn sign_out(
    headers: HeaderMap,
    provider: Extension<Arc<dyn Provider>>,
    config: Extension<Arc<SiteConfig>>,
) -> Response {
    if let Some(token) = cookies::extract_cookie(&headers, cookies::ACCESS_COOKIE_NAME) {
        if let Err(err) = provider.sign_out(&token).await {
            error!("Failed to invalidate session: {err}");
        }
    }

    // Always clear the cookies, even when no session was presented.
    let mut response_headers = HeaderMap::new();
    match cookies::clear_session_cookies(&config) {
        Ok(values) => cookies::append_set_cookies(&mut response_headers, values),
        Err(err) => error!("Failed to build clearing cookies: {err}"),
    }
    (response_headers, Redirect::to(SIGN_IN_PATH)).into_response()
}
