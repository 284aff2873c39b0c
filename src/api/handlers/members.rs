//! Members-area content.
//!
//! Real page rendering lives in the site shell; these handlers return the
//! small JSON payloads behind the two guard stages. The landing page only
//! needs a session; the directory additionally needs an active subscription.

use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;

use crate::provider::SessionUser;

#[utoipa::path(
    get,
    path = "/espace-membres",
    responses(
        (status = 200, description = "Members landing"),
        (status = 303, description = "Redirected to sign-in when unauthenticated")
    ),
    tag = "membres"
)]
pub async fn landing(user: Option<Extension<SessionUser>>) -> impl IntoResponse {
    let email = user.map(|Extension(user)| user.email);
    Json(json!({
        "area": "espace-membres",
        "email": email,
    }))
}

#[utoipa::path(
    get,
    path = "/espace-membres/annuaire",
    responses(
        (status = 200, description = "Members directory"),
        (status = 303, description = "Redirected when unauthenticated or not subscribed")
    ),
    tag = "membres"
)]
pub async fn annuaire(user: Option<Extension<SessionUser>>) -> impl IntoResponse {
    let email = user.map(|Extension(user)| user.email);
    Json(json!({
        "section": "annuaire",
        "membre": email,
    }))
}
