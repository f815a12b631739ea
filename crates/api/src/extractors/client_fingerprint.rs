//! Hashed client identity.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::app::AppState;
use crate::middleware::client_ip::resolve_client_ip;

/// Salted one-way digest of the client IP. The raw address never leaves
/// the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFingerprint {
    pub ip_hash: String,
}

impl ClientFingerprint {
    pub fn from_parts(parts: &Parts, salt: &str, trust_proxy_headers: bool) -> Self {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        let ip = resolve_client_ip(&parts.headers, peer, trust_proxy_headers);
        Self {
            ip_hash: shared::crypto::hash_ip(&ip, salt),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ClientFingerprint {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by the rate limiter when the route has one.
        if let Some(fingerprint) = parts.extensions.get::<ClientFingerprint>() {
            return Ok(fingerprint.clone());
        }
        let security = &state.config.security;
        Ok(Self::from_parts(
            parts,
            &security.ip_hash_salt,
            security.trust_proxy_headers,
        ))
    }
}
