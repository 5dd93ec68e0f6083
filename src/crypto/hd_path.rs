//! BIP-44 derivation paths used by the signing device
//!
//! The host sends the path as five little-endian u32 words in the first chunk
//! of a request. Only paths under `m/44'/283'` (Algorand) are accepted for
//! arbitrary-data signing.

use crate::decoder::error::{ParserError, ParserResult};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use std::str::FromStr;

pub const HD_PATH_LEN: usize = 5;

/// Serialised size of a path in the init chunk
pub const HD_PATH_BYTES: usize = HD_PATH_LEN * 4;

pub const HARDENED: u32 = 0x8000_0000;
pub const PURPOSE: u32 = 44 | HARDENED;
pub const ALGORAND_COIN_TYPE: u32 = 283 | HARDENED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdPath(pub [u32; HD_PATH_LEN]);

impl HdPath {
    /// Decode the path from the start of an init chunk
    pub fn from_bytes(bytes: &[u8]) -> ParserResult<Self> {
        if bytes.len() < HD_PATH_BYTES {
            return Err(ParserError::UnexpectedBufferEnd);
        }
        let mut words = [0u32; HD_PATH_LEN];
        LittleEndian::read_u32_into(&bytes[..HD_PATH_BYTES], &mut words);
        Ok(Self(words))
    }

    /// Standard path for an account index: `m/44'/283'/account'/0/0`
    pub fn from_account(account: u32) -> Self {
        Self([
            PURPOSE,
            ALGORAND_COIN_TYPE,
            account | HARDENED,
            0,
            0,
        ])
    }

    pub fn to_bytes(&self) -> [u8; HD_PATH_BYTES] {
        let mut out = [0u8; HD_PATH_BYTES];
        LittleEndian::write_u32_into(&self.0, &mut out);
        out
    }

    /// First two components must be 44' and 283'
    pub fn is_algorand(&self) -> bool {
        self.0[0] == PURPOSE && self.0[1] == ALGORAND_COIN_TYPE
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in self.0 {
            if component & HARDENED != 0 {
                write!(f, "/{}'", component & !HARDENED)?;
            } else {
                write!(f, "/{}", component)?;
            }
        }
        Ok(())
    }
}

impl FromStr for HdPath {
    type Err = ParserError;

    /// Parse `m/44'/283'/0'/0/0`; `h` is accepted as the hardened marker too
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(ParserError::FailedHdPath);
        }
        let mut words = [0u32; HD_PATH_LEN];
        let mut count = 0;
        for part in parts {
            if count == HD_PATH_LEN {
                return Err(ParserError::FailedHdPath);
            }
            let hardened_digits = part
                .strip_suffix('\'')
                .or_else(|| part.strip_suffix('h'));
            let (digits, hardened) = match hardened_digits {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits.parse().map_err(|_| ParserError::FailedHdPath)?;
            if index & HARDENED != 0 {
                return Err(ParserError::FailedHdPath);
            }
            words[count] = if hardened { index | HARDENED } else { index };
            count += 1;
        }
        if count != HD_PATH_LEN {
            return Err(ParserError::FailedHdPath);
        }
        Ok(Self(words))
    }
}
