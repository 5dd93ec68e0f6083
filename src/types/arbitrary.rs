//! Arbitrary-data signing request
//!
//! Variable-length parts are kept as ranges into the session buffer so the
//! record stays small no matter how large the JSON payload is.

use crate::decoder::json_index::JsonIndex;
use crate::types::transaction::Address;
use std::ops::Range;

/// Only "auth" requests are accepted
pub const SCOPE_AUTH: u8 = 0x01;

/// The host sends the JSON payload base64-encoded
pub const ENCODING_BASE64: u8 = 0x01;

/// Decoded arbitrary-data request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitraryData {
    pub signer: Address,
    pub scope: u8,
    pub encoding: u8,
    pub data: Range<usize>,
    pub domain: Range<usize>,
    pub request_id: Option<Range<usize>>,
    pub auth_data: Range<usize>,
    /// Structural index over `data`
    pub json: JsonIndex,
}

impl ArbitraryData {
    /// Resolve one of the stored ranges against the buffer it was decoded from
    pub fn slice<'a>(&self, buffer: &'a [u8], range: &Range<usize>) -> &'a [u8] {
        buffer.get(range.clone()).unwrap_or_default()
    }
}
