//! Outbound service clients and helpers.

pub mod auth;
pub mod cloudflare;
pub mod cookies;

pub use auth::{AuthClientError, HostedAuthClient};
pub use cloudflare::{CloudflareClient, CloudflareError};
pub use cookies::CookieHelper;
