/// Cryptographic helpers for transaction review
///
/// Addresses, derivation paths and the digests shown in place of large byte
/// fields. Signing itself happens outside this crate.
pub mod address;
pub mod hd_path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

/// SHA-256 of `data`
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Standard base64 with padding
pub fn base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
