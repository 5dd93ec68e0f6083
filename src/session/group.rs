//! Atomic transaction group state
//!
//! Members arrive one message at a time. The group state survives between
//! messages so the running fee, the member count and the hash over all member
//! buffers can be shown once the last member has been decoded.

use crate::decoder::error::{ParserError, ParserResult};
use crate::types::transaction::Transaction;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Largest group the network accepts
pub const MAX_GROUP_SIZE: u8 = 16;

#[derive(Clone, Default)]
pub struct GroupSession {
    initialized: bool,
    expected: u8,
    processed: u8,
    fee_total: u64,
    group_id: Option<[u8; 32]>,
    hasher: Option<Sha256>,
    digest: Option<[u8; 32]>,
}

impl GroupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything about the current group
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start a new group; members are accepted once the size is known
    pub fn initialize(&mut self) {
        *self = Self {
            initialized: true,
            hasher: Some(Sha256::new()),
            ..Self::default()
        };
    }

    pub fn set_expected_count(&mut self, count: u8) -> ParserResult<()> {
        if count == 0 || count > MAX_GROUP_SIZE || count < self.processed {
            return Err(ParserError::ValueOutOfRange);
        }
        self.expected = count;
        Ok(())
    }

    pub fn increment_processed(&mut self) -> ParserResult<()> {
        if self.processed >= self.expected {
            return Err(ParserError::GroupTxnOverflow);
        }
        self.processed += 1;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn expected(&self) -> u8 {
        self.expected
    }

    pub fn processed(&self) -> u8 {
        self.processed
    }

    /// Sum of member fees in microAlgos
    pub fn fee_total(&self) -> u64 {
        self.fee_total
    }

    /// Group id carried by the first member
    pub fn group_id(&self) -> Option<[u8; 32]> {
        self.group_id
    }

    /// Hash over every member buffer, available once the group is complete
    pub fn digest(&self) -> Option<[u8; 32]> {
        self.digest
    }

    pub fn is_complete(&self) -> bool {
        self.initialized && self.expected > 0 && self.processed == self.expected
    }

    /// Fold a decoded and validated member into the group
    ///
    /// Nothing changes unless every check passes.
    pub fn absorb(&mut self, raw: &[u8], tx: &Transaction) -> ParserResult<()> {
        if !self.initialized {
            return Err(ParserError::UnexpectedError);
        }
        if self.processed >= self.expected {
            return Err(ParserError::GroupTxnOverflow);
        }

        let group_id = tx.header.group_id.ok_or(ParserError::MissingField("grp"))?;
        if self.group_id.is_some_and(|first| first != group_id) {
            debug!("Group member {} carries a different group id", self.processed + 1);
            return Err(ParserError::UnexpectedValue);
        }

        let fee_total = self
            .fee_total
            .checked_add(tx.header.fee)
            .ok_or(ParserError::ValueOutOfRange)?;

        let hasher = self.hasher.as_mut().ok_or(ParserError::UnexpectedError)?;
        hasher.update(raw);
        self.group_id = Some(group_id);
        self.fee_total = fee_total;
        self.increment_processed()?;

        if self.processed == self.expected {
            if let Some(hasher) = self.hasher.take() {
                self.digest = Some(hasher.finalize().into());
            }
            debug!(
                "Group complete: {} members, total fee {}",
                self.processed, self.fee_total
            );
        }
        Ok(())
    }
}

impl fmt::Debug for GroupSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSession")
            .field("initialized", &self.initialized)
            .field("expected", &self.expected)
            .field("processed", &self.processed)
            .field("fee_total", &self.fee_total)
            .field("group_id", &self.group_id.map(hex::encode))
            .field("digest", &self.digest.map(hex::encode))
            .finish()
    }
}
