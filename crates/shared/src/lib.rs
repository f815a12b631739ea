//! Shared utilities and common types for the studio site backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Privacy-preserving client identifiers (salted IP digests)
//! - Slug generation for content URLs
//! - Common validation logic
//! - Hosted-auth session token verification
//! - Offset pagination helpers

pub mod crypto;
pub mod pagination;
pub mod session;
pub mod slug;
pub mod validation;
