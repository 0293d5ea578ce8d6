//! Cryptographic Utilities

use rand::{RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random secret of `len` bytes, lowercase hex encoded (`2 * len` chars).
pub fn random_token_hex(len: usize) -> String {
    hex::encode(random_bytes(len))
}
