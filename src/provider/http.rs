//! HTTP client for the hosted provider.
//!
//! Auth operations live under `/auth/v1`, row operations under `/rest/v1`.
//! Every request carries the public API key; user-scoped calls additionally
//! carry the session's bearer token.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::{Account, AccountMetadata, Provider, ProviderError, SessionTokens, SessionUser};

pub struct HttpProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpProvider {
    /// Build a client for the provider at `base_url` using the public key.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Error creating provider HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let builder = builder.header("apikey", self.api_key.expose_secret());
        match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(self.api_key.expose_secret()),
        }
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<SessionTokens, ProviderError> {
        let response = self
            .request(
                self.client
                    .post(self.endpoint("/auth/v1/token"))
                    .query(&[("grant_type", grant_type)])
                    .json(&body),
                None,
            )
            .send()
            .await?;
        let response = reject_on_error(response).await?;
        let value: Value = response.json().await?;
        parse_tokens(&value)
            .ok_or_else(|| ProviderError::rejected("Provider response missing session tokens"))
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        metadata: &AccountMetadata,
    ) -> Result<Option<Account>, ProviderError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": metadata,
        });
        let response = self
            .request(
                self.client.post(self.endpoint("/auth/v1/signup")).json(&body),
                None,
            )
            .send()
            .await?;
        let response = reject_on_error(response).await?;
        let value: Value = response.json().await?;
        // Depending on confirmation settings the user object arrives either
        // at the top level or nested under "user".
        let user = value.get("user").cloned().unwrap_or(value);
        Ok(parse_account(&user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, ProviderError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let response = self
            .request(
                self.client.post(self.endpoint("/auth/v1/logout")),
                Some(access_token),
            )
            .send()
            .await?;
        reject_on_error(response).await?;
        Ok(())
    }

    async fn get_session(&self, access_token: &str) -> Result<SessionUser, ProviderError> {
        let response = self
            .request(
                self.client.get(self.endpoint("/auth/v1/user")),
                Some(access_token),
            )
            .send()
            .await?;
        let response = reject_on_error(response).await?;
        let value: Value = response.json().await?;
        parse_account(&value)
            .map(|account| SessionUser {
                id: account.id,
                email: account.email,
            })
            .ok_or_else(|| ProviderError::rejected("Provider response missing user"))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<SessionTokens, ProviderError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        let response = self
            .request(
                self.client
                    .post(self.endpoint("/auth/v1/recover"))
                    .json(&json!({ "email": email })),
                None,
            )
            .send()
            .await?;
        reject_on_error(response).await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .request(
                self.client
                    .put(self.endpoint("/auth/v1/user"))
                    .json(&json!({ "password": new_password })),
                Some(access_token),
            )
            .send()
            .await?;
        reject_on_error(response).await?;
        Ok(())
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionTokens, ProviderError> {
        self.token_grant("pkce", json!({ "auth_code": code })).await
    }

    async fn insert_row(&self, table: &str, record: &Value) -> Result<(), ProviderError> {
        debug!("inserting row into {table}");
        let response = self
            .request(
                self.client
                    .post(self.endpoint(&format!("/rest/v1/{table}")))
                    .header("Prefer", "return=minimal")
                    .json(record),
                None,
            )
            .send()
            .await?;
        reject_on_error(response).await?;
        Ok(())
    }

    async fn query_one(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Option<Value>, ProviderError> {
        let mut query: Vec<(String, String)> = filters
            .iter()
            .map(|(column, value)| ((*column).to_string(), format!("eq.{value}")))
            .collect();
        query.push(("limit".to_string(), "1".to_string()));

        let response = self
            .request(
                self.client
                    .get(self.endpoint(&format!("/rest/v1/{table}")))
                    .query(&query),
                None,
            )
            .send()
            .await?;
        let response = reject_on_error(response).await?;
        let rows: Vec<Value> = response.json().await?;
        Ok(rows.into_iter().next())
    }
}

/// Turn a non-success response into a `Rejected` error carrying the
/// provider's own message.
async fn reject_on_error(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::rejected(error_message(status, &body)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    // GoTrue-style bodies use "msg" or "error_description"; the row API uses
    // "message". Fall back to the status line when nothing parses.
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("provider returned {status}"))
}

fn parse_account(value: &Value) -> Option<Account> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())?;
    let email = value.get("email").and_then(Value::as_str)?.to_string();
    Some(Account { id, email })
}

fn parse_tokens(value: &Value) -> Option<SessionTokens> {
    let access_token = value.get("access_token").and_then(Value::as_str)?;
    let refresh_token = value.get("refresh_token").and_then(Value::as_str)?;
    Some(SessionTokens {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    })
}
