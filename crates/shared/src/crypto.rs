//! Cryptographic utilities for privacy-preserving client identifiers.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// One-way digest of a client IP address.
///
/// The salt is used as the HMAC key, so the same address hashes to the same
/// value for a given deployment while raw addresses are never recoverable.
/// The result is 64 lowercase hex characters.
pub fn hash_ip(ip: &str, salt: &str) -> String {
    // HMAC accepts keys of any length, including empty.
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC-SHA256 accepts any key length"));
    mac.update(ip.trim().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
