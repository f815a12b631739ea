//! Custom request extractors.

pub mod admin_session;
pub mod client_fingerprint;
pub mod validated_json;

pub use client_fingerprint::ClientFingerprint;
pub use validated_json::ValidatedJson;
