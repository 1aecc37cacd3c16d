//! Cryptographic utilities shared across Recap crates
//!
//! Provides webhook body signing and verification using HMAC-SHA256
//! with constant-time comparison to prevent timing attacks.

use sha2::{Digest, Sha256};

/// SHA-256 block size in bytes, needed for the HMAC key schedule.
const BLOCK_SIZE: usize = 64;

/// Header value prefix for the webhook signature scheme.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute HMAC-SHA256 over a message with the given key.
fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    // Keys longer than the block size are hashed first
    let mut padded_key = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        let digest = Sha256::digest(key);
        padded_key[..digest.len()].copy_from_slice(&digest);
    } else {
        padded_key[..key.len()].copy_from_slice(key);
    }

    let mut inner_key = [0u8; BLOCK_SIZE];
    let mut outer_key = [0u8; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        inner_key[i] = padded_key[i] ^ 0x36;
        outer_key[i] = padded_key[i] ^ 0x5c;
    }

    let mut inner = Sha256::new();
    inner.update(inner_key);
    inner.update(message);
    let inner_hash = inner.finalize();

    let mut outer = Sha256::new();
    outer.update(outer_key);
    outer.update(inner_hash);
    outer.finalize().into()
}

/// Sign a raw webhook body, producing the `sha256=<hex>` header value.
pub fn sign_body(channel_secret: &str, body: &[u8]) -> String {
    let mac = hmac_sha256(channel_secret.as_bytes(), body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac))
}

/// Verify a webhook signature header against the raw request body
/// using constant-time comparison.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature_header: &str) -> bool {
    let encoded = match signature_header.strip_prefix(SIGNATURE_PREFIX) {
        Some(hex_part) => hex_part,
        None => return false,
    };

    let claimed = match hex::decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let expected = hmac_sha256(channel_secret.as_bytes(), body);

    // Constant-time comparison to prevent timing attacks
    if claimed.len() != expected.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in claimed.iter().zip(expected.iter()) {
        result |= a ^ b;
    }
    result == 0
}
