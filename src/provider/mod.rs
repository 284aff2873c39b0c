//! Contracts for the hosted identity and data provider.
//!
//! The troupe site does not own credentials or rows; both live in a hosted
//! backend reached over HTTP. Handlers receive the provider as an
//! `Arc<dyn Provider>` so workflows stay testable without network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub mod http;

pub use http::HttpProvider;

/// Failure modes for provider operations.
///
/// `Rejected` carries the provider's own message and is surfaced to users
/// verbatim; `Fault` covers everything that never produced a provider
/// verdict (connection, TLS, body decoding).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("{message}")]
    Rejected { message: String },
    #[error("{message}")]
    Fault { message: String },
}

impl ProviderError {
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fault {
            message: err.to_string(),
        }
    }
}

/// Account created by the provider on successful sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
}

/// Metadata bag attached to the credential sign-up call.
#[derive(Debug, Clone, Serialize)]
pub struct AccountMetadata {
    pub full_name: String,
    pub email: String,
    pub is_former_member: bool,
    pub join_year: Option<i32>,
    pub phone_number: String,
    pub profession: String,
}

/// Cookie-borne session token pair. Lifetimes are provider-managed; the
/// service only ferries the pair between cookies and provider calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// User resolved from a valid session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
}

/// Operations consumed from the hosted provider. One attempt per call, no
/// retries; callers decide what each failure means.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create credentials plus the metadata bag. `Ok(None)` models the
    /// provider answering without an error but also without a user object.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        metadata: &AccountMetadata,
    ) -> Result<Option<Account>, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str)
        -> Result<SessionTokens, ProviderError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    async fn get_session(&self, access_token: &str) -> Result<SessionUser, ProviderError>;

    async fn refresh_session(&self, refresh_token: &str)
        -> Result<SessionTokens, ProviderError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError>;

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError>;

    /// Complete a redirect-based sign-in by exchanging an authorization code.
    async fn exchange_code(&self, code: &str) -> Result<SessionTokens, ProviderError>;

    async fn insert_row(&self, table: &str, record: &Value) -> Result<(), ProviderError>;

    /// Fetch at most one row matching every `(column, value)` filter.
    async fn query_one(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Option<Value>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_displayed_verbatim() {
        let err = ProviderError::rejected("User already registered");
        assert_eq!(err.to_string(), "User already registered");
        assert!(err.is_rejected());
    }

    #[test]
    fn account_metadata_serializes_null_join_year() {
        let metadata = AccountMetadata {
            full_name: "Jean Dupont".to_string(),
            email: "jean@exemple.com".to_string(),
            is_former_member: true,
            join_year: None,
            phone_number: "+33 6 12 34 56 78".to_string(),
            profession: "Consultant".to_string(),
        };
        let value = serde_json::to_value(&metadata).expect("metadata serializes");
        assert!(value.get("join_year").is_some_and(Value::is_null));
        assert_eq!(
            value.get("is_former_member").and_then(Value::as_bool),
            Some(true)
        );
    }

    #[test]
    fn session_tokens_round_trip() {
        let tokens = SessionTokens {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };
        let value = serde_json::to_value(&tokens).expect("tokens serialize");
        let decoded: SessionTokens = serde_json::from_value(value).expect("tokens deserialize");
        assert_eq!(decoded.access_token, "access");
        assert_eq!(decoded.refresh_token, "refresh");
    }
}
