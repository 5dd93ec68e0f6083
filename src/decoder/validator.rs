//! Post-decode semantic checks and the session integrity canary

use super::error::{ParserError, ParserResult};
use crate::types::transaction::{Transaction, MAX_NOTE_LEN};
use tracing::{debug, error};

/// Checks that need the whole record rather than a single field
pub fn validate(tx: &Transaction) -> ParserResult<()> {
    let header = &tx.header;
    if header.first_valid > header.last_valid {
        debug!(
            "Validity window inverted: fv {} > lv {}",
            header.first_valid, header.last_valid
        );
        return Err(ParserError::ValueOutOfRange);
    }
    if header.note.as_ref().is_some_and(|n| n.len() > MAX_NOTE_LEN) {
        return Err(ParserError::UnexpectedValue);
    }
    Ok(())
}

const CANARY_MAGIC: u32 = 0x5a3c_c3a5;

/// Sentinel kept alongside decoder state
///
/// Guards the session layout: the value is private and never written after
/// construction, so safe code cannot trip it. A mismatch means memory was
/// overwritten from outside (unsafe code, a host FFI bug) and nothing derived
/// from the state can be trusted, so a failed check aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canary(u32);

impl Canary {
    pub fn new() -> Self {
        Canary(CANARY_MAGIC)
    }

    pub fn check(&self) {
        if self.0 != CANARY_MAGIC {
            error!("Decoder canary corrupted: {:#010x}", self.0);
            panic!("decoder state corrupted");
        }
    }
}

impl Default for Canary {
    fn default() -> Self {
        Self::new()
    }
}
