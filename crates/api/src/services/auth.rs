//! Hosted auth service client.
//!
//! Admin accounts live in the external store's auth service. The API only
//! forwards sign-in and password-reset requests to it; it never sees or
//! stores password hashes.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::HostedAuthConfig;

#[derive(Debug, Error)]
pub enum AuthClientError {
    #[error("Hosted auth is not configured")]
    NotConfigured,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth service returned status {0}")]
    Upstream(u16),
}

/// Token pair returned by a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RecoverRequest<'a> {
    email: &'a str,
}

pub struct HostedAuthClient {
    client: Client,
    config: HostedAuthConfig,
}

impl std::fmt::Debug for HostedAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedAuthClient")
            .field("url", &self.config.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HostedAuthClient {
    pub fn new(config: HostedAuthConfig) -> Result<Self, AuthClientError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> AuthClientError {
        if e.is_timeout() {
            AuthClientError::Timeout(self.config.timeout_ms)
        } else {
            AuthClientError::Http(e)
        }
    }

    /// Email/password sign-in (`POST /token?grant_type=password`).
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, AuthClientError> {
        if !self.is_configured() {
            return Err(AuthClientError::NotConfigured);
        }

        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.api_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<AuthTokens>().await?),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AuthClientError::InvalidCredentials)
            }
            status => {
                tracing::warn!(status = status.as_u16(), "Hosted auth sign-in failed");
                Err(AuthClientError::Upstream(status.as_u16()))
            }
        }
    }

    /// Sends the password-reset email (`POST /recover`).
    pub async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthClientError> {
        if !self.is_configured() {
            return Err(AuthClientError::NotConfigured);
        }

        let mut request = self
            .client
            .post(self.endpoint("recover"))
            .header("apikey", &self.config.api_key)
            .json(&RecoverRequest { email });
        if let Some(redirect_to) = redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthClientError::Upstream(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> HostedAuthConfig {
        HostedAuthConfig {
            url: url.into(),
            api_key: "anon-key".into(),
            timeout_ms: 1000,
        }
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = HostedAuthClient::new(config("https://proj.example.co/auth/v1/")).unwrap();
        assert_eq!(client.endpoint("token"), "https://proj.example.co/auth/v1/token");
        assert_eq!(client.endpoint("recover"), "https://proj.example.co/auth/v1/recover");
    }

    #[tokio::test]
    async fn test_unconfigured_sign_in() {
        let client = HostedAuthClient::new(HostedAuthConfig::default()).unwrap();
        assert!(matches!(
            client.sign_in_with_password("a@example.com", "pw").await,
            Err(AuthClientError::NotConfigured)
        ));
        assert!(matches!(
            client.send_password_reset("a@example.com", None).await,
            Err(AuthClientError::NotConfigured)
        ));
    }

    #[test]
    fn test_token_response_parses() {
        let tokens: AuthTokens = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": { "id": "6b7e2a4e-3a0e-4c3b-9f55-0c9a3f1f2d11", "email": "owner@example.com" }
        }))
        .unwrap();
        assert_eq!(tokens.expires_in, 3600);
        assert_eq!(tokens.user.unwrap().email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = HostedAuthClient::new(config("https://x")).unwrap();
        assert!(!format!("{:?}", client).contains("anon-key"));
    }
}
