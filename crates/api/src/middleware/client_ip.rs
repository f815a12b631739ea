//! Client address resolution.
//!
//! The site runs behind Cloudflare and a reverse proxy, so the socket peer is
//! rarely the real client. Proxy headers are consulted first when trusted.
//! Without a proxy in front they are client-controlled and only the peer
//! counts.

use axum::{
    extract::ConnectInfo,
    http::{HeaderMap, Request},
};
use std::net::SocketAddr;

pub const CF_CONNECTING_IP: &str = "cf-connecting-ip";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Placeholder used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolves the client address from proxy headers, falling back to the peer.
///
/// Order: `cf-connecting-ip`, first `x-forwarded-for` entry, `x-real-ip`,
/// then the socket address. With `trust_proxy_headers` off only the socket
/// address is used.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(headers) {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<&str> {
    if let Some(ip) = header_str(headers, CF_CONNECTING_IP) {
        return Some(ip);
    }

    header_str(headers, X_FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_str(headers, X_REAL_IP))
}

/// Same as [`resolve_client_ip`] using the request's `ConnectInfo`, if any.
pub fn client_ip_from_request<B>(req: &Request<B>, trust_proxy_headers: bool) -> String {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    resolve_client_ip(req.headers(), peer, trust_proxy_headers)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
