//! Arbitrary-data (authentication request) decoder
//!
//! Layout, all lengths u32 big-endian:
//!
//! ```text
//! signer[32] | scope u8 | encoding u8 | len data | len domain
//!            | len request id | len auth data
//! ```
//!
//! The request id may be empty, every other part is mandatory.

use super::error::{ParserError, ParserResult};
use super::json_index::JsonIndex;
use super::reader::Reader;
use crate::crypto::{self, hd_path::HdPath};
use crate::types::arbitrary::{ArbitraryData, ENCODING_BASE64, SCOPE_AUTH};
use crate::types::transaction::Address;
use std::ops::Range;
use tracing::debug;

/// Length of the signed message: two SHA-256 digests
pub const SIGNING_MESSAGE_LEN: usize = 64;

/// Decode and check an arbitrary-data request held in `buf`
///
/// `hd_path` and `active_key` come from the session: the request can only be
/// signed by the key the device derived for an Algorand path.
pub fn decode_arbitrary(
    buf: &[u8],
    hd_path: Option<&HdPath>,
    active_key: Option<&Address>,
) -> ParserResult<ArbitraryData> {
    if buf.is_empty() {
        return Err(ParserError::InitContextEmpty);
    }
    match hd_path {
        Some(path) if path.is_algorand() => {}
        _ => return Err(ParserError::FailedHdPath),
    }

    let mut reader = Reader::new(buf);

    let signer: Address = reader.read_array()?;
    if active_key != Some(&signer) {
        debug!("Signer does not match the active key");
        return Err(ParserError::InvalidSigner);
    }

    let scope = reader.read_u8()?;
    if scope != SCOPE_AUTH {
        return Err(ParserError::InvalidScope);
    }
    let encoding = reader.read_u8()?;
    if encoding != ENCODING_BASE64 {
        return Err(ParserError::InvalidEncoding);
    }

    let data = read_field(&mut reader)?;
    let text = &buf[data.clone()];
    if std::str::from_utf8(text).is_err() {
        return Err(ParserError::FailedDecoding);
    }
    let json = JsonIndex::parse(text)?;

    let domain = read_field(&mut reader)?;
    check_domain(&buf[domain.clone()])?;

    let request_id = read_field(&mut reader)?;
    let request_id = if request_id.is_empty() {
        None
    } else {
        check_request_id(&buf[request_id.clone()])?;
        Some(request_id)
    };

    let auth_data = read_field(&mut reader)?;
    check_auth_data(&buf[auth_data.clone()], &buf[domain.clone()])?;

    if !reader.is_exhausted() {
        debug!("{} trailing bytes after auth data", reader.remaining());
        return Err(ParserError::UnexpectedValue);
    }

    debug!(
        "Decoded arbitrary data: {} data bytes, {} JSON members",
        data.len(),
        json.member_count()
    );

    Ok(ArbitraryData {
        signer,
        scope,
        encoding,
        data,
        domain,
        request_id,
        auth_data,
        json,
    })
}

/// `SHA-256(data) || SHA-256(auth data)`
pub fn signing_message(buf: &[u8], request: &ArbitraryData) -> [u8; SIGNING_MESSAGE_LEN] {
    let mut message = [0u8; SIGNING_MESSAGE_LEN];
    message[..32].copy_from_slice(&crypto::sha256(request.slice(buf, &request.data)));
    message[32..].copy_from_slice(&crypto::sha256(request.slice(buf, &request.auth_data)));
    message
}

/// Read a u32-prefixed field and return where it sits in the buffer
fn read_field(reader: &mut Reader<'_>) -> ParserResult<Range<usize>> {
    let len = reader.read_u32()? as usize;
    let start = reader.offset();
    reader.read_bytes(len)?;
    Ok(start..start + len)
}

fn check_domain(domain: &[u8]) -> ParserResult<()> {
    if domain.is_empty() {
        return Err(ParserError::MissingDomain);
    }
    if !domain.iter().all(|b| (32..=126).contains(b)) {
        return Err(ParserError::InvalidDomain);
    }
    Ok(())
}

fn check_request_id(request_id: &[u8]) -> ParserResult<()> {
    if request_id
        .iter()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(b))
    {
        Ok(())
    } else {
        Err(ParserError::InvalidRequestId)
    }
}

/// The auth data must open with the hash of the domain it was issued for
fn check_auth_data(auth_data: &[u8], domain: &[u8]) -> ParserResult<()> {
    if auth_data.is_empty() {
        return Err(ParserError::MissingAuthenticatedData);
    }
    match auth_data.get(..32) {
        Some(prefix) if prefix == crypto::sha256(domain) => Ok(()),
        _ => Err(ParserError::FailedDomainAuth),
    }
}
