//! Member sign-up workflow.
//!
//! Validation short-circuits at the first failure; every outcome, good or
//! bad, is a redirect back to the sign-up page with a typed message. The
//! provider is called at most once for the account and once for the profile
//! row, with no retries.

use axum::{extract::Extension, response::IntoResponse, Form};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, instrument};

use super::redirect::{encoded_redirect, MessageKind};
use super::types::SignupForm;
use crate::api::state::{SiteConfig, SIGN_UP_PATH};
use crate::provider::{AccountMetadata, Provider, ProviderError};

/// Provider table holding member profile rows.
pub(crate) const PROFILE_TABLE: &str = "users";

#[utoipa::path(
    post,
    path = "/sign-up",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Outcome delivered as a typed redirect message")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn sign_up(
    provider: Extension<Arc<dyn Provider>>,
    config: Extension<Arc<SiteConfig>>,
    payload: Option<Form<SignupForm>>,
) -> impl IntoResponse {
    let form = payload.map(|Form(form)| form).unwrap_or_default();

    if form.email.is_empty() || form.password.is_empty() {
        return encoded_redirect(
            MessageKind::Error,
            SIGN_UP_PATH,
            "Email et mot de passe sont requis",
        );
    }

    if !config.secret_code_matches(&form.secret_code) {
        return encoded_redirect(
            MessageKind::Error,
            SIGN_UP_PATH,
            "Le mot de passe secret est incorrect. Seuls les membres de la troupe peuvent s'inscrire.",
        );
    }

    if form.join_year.is_empty() {
        return encoded_redirect(
            MessageKind::Error,
            SIGN_UP_PATH,
            "Veuillez indiquer votre année d'entrée dans la troupe",
        );
    }

    if form.phone_number.is_empty() {
        return encoded_redirect(
            MessageKind::Error,
            SIGN_UP_PATH,
            "Veuillez indiquer votre numéro de téléphone",
        );
    }

    if form.profession.is_empty() {
        return encoded_redirect(
            MessageKind::Error,
            SIGN_UP_PATH,
            "Veuillez indiquer votre activité professionnelle actuelle",
        );
    }

    let metadata = AccountMetadata {
        full_name: form.full_name.clone(),
        email: form.email.clone(),
        is_former_member: true,
        join_year: form.join_year.parse::<i32>().ok(),
        phone_number: form.phone_number.clone(),
        profession: form.profession.clone(),
    };

    let account = match provider
        .create_account(&form.email, &form.password, &metadata)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            return encoded_redirect(
                MessageKind::Error,
                SIGN_UP_PATH,
                "Erreur lors de la création du compte utilisateur",
            );
        }
        Err(err) => {
            error!("Sign-up refused by provider: {err}");
            return encoded_redirect(MessageKind::Error, SIGN_UP_PATH, &err.to_string());
        }
    };

    let record = json!({
        "id": account.id,
        "user_id": account.id,
        "name": form.full_name,
        "email": form.email,
        "token_identifier": account.id,
        "created_at": Utc::now().to_rfc3339(),
        "is_former_member": true,
        "join_year": metadata.join_year,
        "phone_number": form.phone_number,
        "profession": form.profession,
    });

    match provider.insert_row(PROFILE_TABLE, &record).await {
        Ok(()) => {}
        Err(ProviderError::Rejected { message }) => {
            // The account now exists at the provider without a profile row;
            // nothing rolls it back here.
            error!("Profile insert rejected: {message}");
            return encoded_redirect(
                MessageKind::Error,
                SIGN_UP_PATH,
                &format!(
                    "Erreur lors de l'enregistrement des informations dans la base de données: {message}"
                ),
            );
        }
        Err(err) => {
            error!("Profile insert failed: {err}");
            return encoded_redirect(
                MessageKind::Error,
                SIGN_UP_PATH,
                &format!("Erreur lors de l'inscription: {}", fault_message(&err)),
            );
        }
    }

    encoded_redirect(
        MessageKind::Success,
        SIGN_UP_PATH,
        "Merci de vous être inscrit ! Veuillez vérifier votre email pour le lien de confirmation.",
    )
}

fn fault_message(err: &ProviderError) -> String {
    let message = err.to_string();
    if message.is_empty() {
        "Une erreur inattendue s'est produite".to_string()
    } else {
        message
    }
}
