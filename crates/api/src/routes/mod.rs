//! HTTP route handlers.

pub mod admin;
pub mod admin_content;
pub mod admin_intakes;
pub mod admin_settings;
pub mod admin_subscribers;
pub mod analytics;
pub mod auth;
pub mod cloudflare;
pub mod content;
pub mod health;
pub mod intake;
pub mod newsletter;
pub mod theme;
