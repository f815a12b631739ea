//! Hosted-auth session token verification.
//!
//! Admin sign-in is handled by the external store's auth service, which issues
//! HS256-signed JWT access tokens using the project's shared secret. This
//! module only verifies those tokens; it never issues production tokens.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for session verification.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session has expired")]
    Expired,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session is not authenticated")]
    NotAuthenticated,

    #[error("Session secret is not configured")]
    MissingSecret,
}

/// Claims carried by a hosted-auth access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Account email, when present
    #[serde(default)]
    pub email: Option<String>,
    /// Postgres role the token maps to; signed-in users are `authenticated`
    #[serde(default)]
    pub role: String,
}

/// A verified admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Role assigned to signed-in users by the hosted auth service.
pub const AUTHENTICATED_ROLE: &str = "authenticated";

/// Verifies hosted-auth access tokens.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    leeway_secs: u64,
    #[cfg(any(test, feature = "test-util"))]
    secret: String,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("leeway_secs", &self.leeway_secs)
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl SessionVerifier {
    /// Creates a verifier from the project's JWT secret.
    pub fn new(secret: &str, leeway_secs: u64) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::MissingSecret);
        }
        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway_secs,
            #[cfg(any(test, feature = "test-util"))]
            secret: secret.to_string(),
        })
    }

    /// Validates a token and returns the session it represents.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        // Hosted auth sets `aud` to "authenticated"; role is checked explicitly below.
        validation.validate_aud = false;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::InvalidToken,
            },
        )?;

        if data.claims.role != AUTHENTICATED_ROLE {
            return Err(SessionError::NotAuthenticated);
        }

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| SessionError::InvalidToken)?;

        Ok(VerifiedSession {
            user_id,
            email: data.claims.email,
        })
    }

    /// Issues a token signed with the verifier's secret. Test support only.
    #[cfg(any(test, feature = "test-util"))]
    pub fn issue_for_testing(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
        expires_in_secs: i64,
    ) -> String {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: now + expires_in_secs,
            iat: now,
            email: Some(email.to_string()),
            role: role.to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("test token encoding")
    }
}
