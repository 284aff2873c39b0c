//! OpenAPI document for the documented routes.

use utoipa::OpenApi;

use super::handlers::{auth, health, members};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::sign_up::sign_up,
        auth::sign_in::sign_in,
        auth::sign_in::sign_out,
        auth::password::forgot_password,
        auth::password::reset_password,
        auth::callback::callback,
        members::landing,
        members::annuaire,
    ),
    components(schemas(
        health::Health,
        auth::types::SignupForm,
        auth::types::SignInForm,
        auth::types::ForgotPasswordForm,
        auth::types::ResetPasswordForm,
    )),
    tags(
        (name = "auth", description = "Member authentication workflows"),
        (name = "membres", description = "Members-area content"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
