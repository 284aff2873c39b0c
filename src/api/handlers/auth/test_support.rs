//! Shared scaffolding for handler tests: a scriptable in-memory provider and
//! small response helpers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

use crate::api::state::SiteConfig;
use crate::provider::{
    Account, AccountMetadata, Provider, ProviderError, SessionTokens, SessionUser,
};

#[derive(Default)]
pub(crate) struct MockProvider {
    pub accounts: Mutex<Vec<Account>>,
    pub inserted: Mutex<Vec<(String, Value)>>,
    pub create_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
    pub session_calls: AtomicUsize,
    pub signed_out: AtomicBool,
    pub create_error: Mutex<Option<ProviderError>>,
    pub create_returns_no_user: AtomicBool,
    pub insert_error: Mutex<Option<ProviderError>>,
    pub sign_in_error: Mutex<Option<ProviderError>>,
    pub session_user: Mutex<Option<SessionUser>>,
    pub subscription: Mutex<Option<Value>>,
    pub query_error: Mutex<Option<ProviderError>>,
    pub reset_error: Mutex<Option<ProviderError>>,
    pub update_error: Mutex<Option<ProviderError>>,
    pub updated_passwords: Mutex<Vec<String>>,
    pub reset_requests: Mutex<Vec<String>>,
}

fn scripted(slot: &Mutex<Option<ProviderError>>) -> Option<ProviderError> {
    slot.lock().expect("mock lock").clone()
}

fn mock_tokens(prefix: &str) -> SessionTokens {
    SessionTokens {
        access_token: format!("{prefix}-access"),
        refresh_token: format!("{prefix}-refresh"),
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn create_account(
        &self,
        email: &str,
        _password: &str,
        _metadata: &AccountMetadata,
    ) -> Result<Option<Account>, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = scripted(&self.create_error) {
            return Err(err);
        }
        if self.create_returns_no_user.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        self.accounts.lock().expect("mock lock").push(account.clone());
        Ok(Some(account))
    }

    async fn sign_in(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<SessionTokens, ProviderError> {
        if let Some(err) = scripted(&self.sign_in_error) {
            return Err(err);
        }
        Ok(mock_tokens("password"))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), ProviderError> {
        self.signed_out.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn get_session(&self, _access_token: &str) -> Result<SessionUser, ProviderError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.session_user
            .lock()
            .expect("mock lock")
            .clone()
            .ok_or_else(|| ProviderError::rejected("invalid JWT"))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<SessionTokens, ProviderError> {
        Ok(mock_tokens("refreshed"))
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        if let Some(err) = scripted(&self.reset_error) {
            return Err(err);
        }
        self.reset_requests
            .lock()
            .expect("mock lock")
            .push(email.to_string());
        Ok(())
    }

    async fn update_password(
        &self,
        _access_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        if let Some(err) = scripted(&self.update_error) {
            return Err(err);
        }
        self.updated_passwords
            .lock()
            .expect("mock lock")
            .push(new_password.to_string());
        Ok(())
    }

    async fn exchange_code(&self, _code: &str) -> Result<SessionTokens, ProviderError> {
        Ok(mock_tokens("exchanged"))
    }

    async fn insert_row(&self, table: &str, record: &Value) -> Result<(), ProviderError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = scripted(&self.insert_error) {
            return Err(err);
        }
        self.inserted
            .lock()
            .expect("mock lock")
            .push((table.to_string(), record.clone()));
        Ok(())
    }

    async fn query_one(
        &self,
        _table: &str,
        _filters: &[(&str, &str)],
    ) -> Result<Option<Value>, ProviderError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = scripted(&self.query_error) {
            return Err(err);
        }
        Ok(self.subscription.lock().expect("mock lock").clone())
    }
}

pub(crate) fn mock_provider() -> Arc<MockProvider> {
    Arc::new(MockProvider::default())
}

pub(crate) fn site_config() -> Arc<SiteConfig> {
    Arc::new(SiteConfig::new("http://localhost:3000".to_string()))
}

pub(crate) fn location(response: &Response) -> String {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default()
}
