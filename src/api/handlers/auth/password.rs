//! Password recovery workflows.

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
use super::types::{ForgotPasswordForm, ResetPasswordForm};
use crate::api::state::{FORGOT_PASSWORD_PATH, RESET_PASSWORD_PATH};
use crate::provider::Provider;

#[utoipa::path(
    post,
    path = "/forgot-password",
    request_body(content = ForgotPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Reset email requested, or an error redirect")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn forgot_password(
    provider: Extension<Arc<dyn Provider>>,
    payload: Option<Form<ForgotPasswordForm>>,
) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();

    if form.email.is_empty() {
        return encoded_redirect(MessageKind::Error, FORGOT_PASSWORD_PATH, "Email is required")
            .into_response();
    }

    if let Err(err) = provider.request_password_reset(&form.email).await {
        error!("Password reset request failed: {err}");
        return encoded_redirect(
            MessageKind::Error,
            FORGOT_PASSWORD_PATH,
            "Could not reset password",
        )
        .into_response();
    }

    if !form.callback_url.is_empty() {
        return Redirect::to(&form.callback_url).into_response();
    }

    encoded_redirect(
        MessageKind::Success,
        FORGOT_PASSWORD_PATH,
        "Check your email for a link to reset your password.",
    )
    .into_response()
}

#[utoipa::path(
    post,
    path = "/espace-membres/reset-password",
    request_body(content = ResetPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Password updated, or an error redirect")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn reset_password(
    headers: HeaderMap,
    provider: Extension<Arc<dyn Provider>>,
    payload: Option<Form<ResetPasswordForm>>,
) -> Response {
    let form = payload.map(|Form(form)| form).unwrap_or_default();

    if form.password.is_empty() || form.confirm_password.is_empty() {
        return encoded_redirect(
            MessageKind::Error,
            RESET_PASSWORD_PATH,
            "Password and confirm password are required",
        )
        .into_response();
    }

    if form.password != form.confirm_password {
        return encoded_redirect(
            MessageKind::Error,
            RESET_PASSWORD_PATH,
            "Passwords do not match",
        )
        .into_response();
    }

    let Some(access_token) = cookies::extract_cookie(&headers, cookies::ACCESS_COOKIE_NAME) else {
        return encoded_redirect(
            MessageKind::Error,
            RESET_PASSWORD_PATH,
            "Password update failed",
        )
        .into_response();
    };

    if let Err(err) = provider.update_password(&access_token, &form.password).await {
        error!("Password update failed: {err}");
        return encoded_redirect(
            MessageKind::Error,
            RESET_PASSWORD_PATH,
            "Password update failed",
        )
        .into_response();
    }

    encoded_redirect(MessageKind::Success, RESET_PASSWORD_PATH, "Password updated").into_response()
}
