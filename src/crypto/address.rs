//! Algorand address encoding
//!
//! An address is the base32 (RFC 4648, no padding) encoding of the 32-byte
//! public key followed by a 4-byte checksum: the last four bytes of the
//! SHA-512/256 digest of the key. The result is always 58 characters.
//!
//! # Usage
//!
//! ```rust
//! use algo_tx_review::crypto::address;
//!
//! let encoded = address::encode(&[0u8; 32]);
//! assert_eq!(encoded, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ");
//! ```
use sha2::{Digest, Sha512_256};

/// RFC 4648 base32 alphabet
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const CHECKSUM_LEN: usize = 4;

/// Length of an encoded address
pub const ADDRESS_LEN: usize = 58;

/// Encode a public key as an Algorand address
pub fn encode(public_key: &[u8; 32]) -> String {
    let digest = Sha512_256::digest(public_key);
    let mut raw = [0u8; 32 + CHECKSUM_LEN];
    raw[..32].copy_from_slice(public_key);
    raw[32..].copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    base32_encode(&raw)
}

/// Render an address for review; an all-zero key shows as "Zero"
pub fn display(public_key: &[u8; 32]) -> String {
    if public_key.iter().all(|&b| b == 0) {
        "Zero".to_string()
    } else {
        encode(public_key)
    }
}

fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut acc: u32 = 0;
    let mut bits = 0u32;

    for &byte in data {
        acc = ((acc << 8) | u32::from(byte)) & 0xfff;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(char::from(BASE32_ALPHABET[((acc >> bits) & 0x1f) as usize]));
        }
    }
    if bits > 0 {
        out.push(char::from(
            BASE32_ALPHABET[((acc << (5 - bits)) & 0x1f) as usize],
        ));
    }
    out
}
