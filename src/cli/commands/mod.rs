//! Subcommands and the helpers they share: reading hex input, feeding the
//! session in chunks and printing review rows.

pub mod data;
pub mod group;
pub mod tx;

use crate::decoder::error::ParserError;
use crate::errors::{AppError, AppResult};
use crate::session::DecoderSession;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

/// Largest chunk the transport layer sends in one APDU
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// One printed page of a review row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub index: u8,
    pub key: String,
    pub page: u8,
    pub page_count: u8,
    pub value: String,
}

/// Decode a hex argument; whitespace and a leading `0x` are ignored
pub fn decode_hex(input: &str) -> AppResult<Vec<u8>> {
    let cleaned: String = input.split_whitespace().collect();
    let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
    Ok(hex::decode(cleaned)?)
}

fn read_hex_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    decode_hex(&text).with_context(|| format!("{} does not contain valid hex", path.display()))
}

/// Message bytes from either a positional hex argument or a file
pub fn load_message(hex: Option<&str>, file: Option<&Path>) -> AppResult<Vec<u8>> {
    match (hex, file) {
        (Some(hex), None) => decode_hex(hex),
        (None, Some(path)) => {
            read_hex_file(path).map_err(|e| AppError::InvalidInput(format!("{:#}", e)))
        }
        _ => Err(AppError::InvalidInput(
            "Provide the message either as hex or with --file".to_string(),
        )),
    }
}

/// Feed `message` to the session the way the transport layer would
pub fn feed(session: &mut DecoderSession, message: &[u8], chunk_size: usize) -> AppResult<()> {
    if chunk_size == 0 {
        return Err(AppError::InvalidInput(
            "--chunk-size must be at least 1".to_string(),
        ));
    }
    session.tx_initialize();
    for chunk in message.chunks(chunk_size) {
        if session.tx_append(chunk) < chunk.len() {
            return Err(ParserError::BufferFull.into());
        }
    }
    Ok(())
}

/// Walk every row and page of the parsed message
pub fn collect_rows(session: &DecoderSession) -> AppResult<Vec<ReviewRow>> {
    let mut rows = Vec::new();
    for index in 0..session.tx_get_num_items()? {
        let first = session.tx_get_item(index, 0)?;
        let page_count = first.page_count;
        rows.push(ReviewRow {
            index,
            key: first.key,
            page: 1,
            page_count,
            value: first.value,
        });
        for page in 1..page_count {
            let field = session.tx_get_item(index, page)?;
            rows.push(ReviewRow {
                index,
                key: field.key,
                page: page + 1,
                page_count,
                value: field.value,
            });
        }
    }
    Ok(rows)
}

/// `idx | key [p/n] : value`, one line per page
pub fn format_row(row: &ReviewRow) -> String {
    format!(
        "{} | {} [{}/{}] : {}",
        row.index, row.key, row.page, row.page_count, row.value
    )
}

pub fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(format!("Failed to serialise output: {}", e)))
}

pub fn print_rows(rows: &[ReviewRow], json: bool) -> AppResult<()> {
    if json {
        println!("{}", to_json(&rows)?);
    } else {
        for row in rows {
            println!("{}", format_row(row));
        }
    }
    Ok(())
}
