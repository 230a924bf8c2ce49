//! REST client for the authentication endpoints.
//!
//! The backend issues a bearer token from the credential exchange and from
//! the registration exchange; both respond with `{ "access": "<token>" }`.
//! The session consumes the client through the `AuthExchange` trait so tests
//! can substitute a scripted exchange.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AuthError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backends while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Credential exchange path, relative to the API base URL.
const TOKEN_PATH: &str = "/api/token/";

/// Registration exchange path, relative to the API base URL.
const REGISTER_PATH: &str = "/api/auth/register/";

/// Wire shape of a successful exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// The confirmation field is validated client-side and never serialized.
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// The two credential exchanges the session depends on.
#[async_trait]
pub trait AuthExchange: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, AuthError>;
}

/// API client for the authentication backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthExchange for AuthClient {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Credential exchange response received");

        if !status.is_success() {
            return Err(AuthError::from_login_status(status));
        }
        Ok(response.json().await?)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Registration exchange response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::from_register_status(status, &body));
        }
        Ok(response.json().await?)
    }
}
