//! Decoder session: buffering, parsing and review for one message at a time
//!
//! The transport side feeds chunks with [`DecoderSession::tx_append`]; the UI
//! side parses the buffer once and then pages through the review rows. Group
//! state and the signing context (HD path, active key) outlive single
//! messages and are only cleared explicitly.

pub mod buffering;
pub mod group;

use crate::config::{BufferingConfig, ReviewConfig};
use crate::crypto::hd_path::HdPath;
use crate::decoder::arbitrary::{decode_arbitrary, signing_message, SIGNING_MESSAGE_LEN};
use crate::decoder::display::{
    arbitrary_field, arbitrary_item_count, group_field, transaction_field, GROUP_ITEM_COUNT,
};
use crate::decoder::error::{ParserError, ParserResult};
use crate::decoder::transaction::{decode_transaction, DecodedTransaction};
use crate::decoder::validator::{validate, Canary};
use crate::types::arbitrary::ArbitraryData;
use crate::types::display::DisplayField;
use crate::types::transaction::Address;
use buffering::Buffering;
use group::GroupSession;
use tracing::{debug, warn};

/// Domain-separation prefix signed in front of a transaction
pub const TX_SIGN_PREFIX: &[u8] = b"TX";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Transaction,
    ArbitraryData,
}

/// Bytes handed to the signer once a review has been accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningPayload {
    Transaction(Vec<u8>),
    ArbitraryData([u8; SIGNING_MESSAGE_LEN]),
}

impl SigningPayload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SigningPayload::Transaction(bytes) => bytes,
            SigningPayload::ArbitraryData(message) => message,
        }
    }
}

#[derive(Debug)]
enum Parsed {
    Transaction {
        decoded: DecodedTransaction,
        grouped: bool,
    },
    ArbitraryData(ArbitraryData),
}

#[derive(Debug)]
pub struct DecoderSession {
    review: ReviewConfig,
    buffering_config: BufferingConfig,
    buffering: Buffering,
    group: GroupSession,
    hd_path: Option<HdPath>,
    active_key: Option<Address>,
    parsed: Option<Parsed>,
    /// The buffered message has already been counted as a group member
    absorbed: bool,
    canary: Canary,
}

impl DecoderSession {
    pub fn new(review: ReviewConfig, buffering_config: BufferingConfig) -> Self {
        let mut buffering = Buffering::new();
        buffering.init(buffering_config.ram_capacity, buffering_config.flash_capacity);
        Self {
            review,
            buffering_config,
            buffering,
            group: GroupSession::new(),
            hd_path: None,
            active_key: None,
            parsed: None,
            absorbed: false,
            canary: Canary::new(),
        }
    }

    /// Start a new message, discarding the previous one
    pub fn tx_initialize(&mut self) {
        self.buffering.init(
            self.buffering_config.ram_capacity,
            self.buffering_config.flash_capacity,
        );
        self.parsed = None;
        self.absorbed = false;
    }

    pub fn tx_reset(&mut self) {
        self.buffering.reset();
        self.parsed = None;
        self.absorbed = false;
    }

    /// Append a chunk of the current message
    ///
    /// Returns the bytes accepted. A chunk that does not fit drops the whole
    /// message.
    pub fn tx_append(&mut self, data: &[u8]) -> usize {
        self.absorbed = false;
        let accepted = self.buffering.append(data);
        if accepted < data.len() {
            warn!(
                "Message buffer full: {} buffered, {} more offered",
                self.buffering.length(),
                data.len()
            );
            self.tx_reset();
        }
        accepted
    }

    pub fn tx_get_buffer(&self) -> &[u8] {
        self.buffering.buffer()
    }

    /// Decode the buffered message; on failure nothing is left to review
    pub fn tx_parse(&mut self, kind: ContentKind) -> ParserResult<()> {
        self.parsed = None;
        let result = match kind {
            ContentKind::Transaction => self.parse_transaction(),
            ContentKind::ArbitraryData => self.parse_arbitrary(),
        };
        match result {
            Ok(parsed) => {
                self.parsed = Some(parsed);
                Ok(())
            }
            Err(e) => {
                warn!("Rejected {:?}: {} (0x{:04X})", kind, e, e.status_code());
                Err(e)
            }
        }
    }

    fn parse_transaction(&mut self) -> ParserResult<Parsed> {
        let grouped = self.group.is_initialized();
        if grouped && !self.review.blind_signing {
            return Err(ParserError::BlindsignModeRequired);
        }

        let buf = self.buffering.buffer();
        let decoded = decode_transaction(buf, self.review.blind_signing)?;
        self.canary.check();
        validate(&decoded.tx)?;
        self.canary.check();

        // Parsing the same message again reviews it without counting it twice
        if grouped && !self.absorbed {
            self.group.absorb(buf, &decoded.tx)?;
            self.absorbed = true;
            debug!(
                "Group member {} of {} accepted",
                self.group.processed(),
                self.group.expected()
            );
        }

        Ok(Parsed::Transaction { decoded, grouped })
    }

    fn parse_arbitrary(&mut self) -> ParserResult<Parsed> {
        let request = decode_arbitrary(
            self.buffering.buffer(),
            self.hd_path.as_ref(),
            self.active_key.as_ref(),
        )?;
        self.canary.check();
        Ok(Parsed::ArbitraryData(request))
    }

    /// Number of review rows for the parsed message
    pub fn tx_get_num_items(&self) -> ParserResult<u8> {
        self.canary.check();
        let count = match self.parsed.as_ref().ok_or(ParserError::NoData)? {
            Parsed::Transaction { grouped: true, .. } => usize::from(GROUP_ITEM_COUNT),
            Parsed::Transaction { decoded, .. } => 1 + decoded.display.len(),
            Parsed::ArbitraryData(request) => arbitrary_item_count(request, self.hd_path.as_ref()),
        };
        u8::try_from(count).map_err(|_| ParserError::ValueOutOfRange)
    }

    /// One page of one review row
    pub fn tx_get_item(&self, display_idx: u8, page_idx: u8) -> ParserResult<DisplayField> {
        self.canary.check();
        let display_idx = usize::from(display_idx);
        let page_idx = usize::from(page_idx);
        let width = self.review.page_width;

        match self.parsed.as_ref().ok_or(ParserError::NoData)? {
            Parsed::Transaction { grouped: true, .. } => {
                group_field(&self.group, display_idx, page_idx, width)
            }
            Parsed::Transaction { decoded, .. } => transaction_field(
                &decoded.tx,
                &decoded.display,
                display_idx,
                page_idx,
                width,
            ),
            Parsed::ArbitraryData(request) => arbitrary_field(
                self.buffering.buffer(),
                request,
                self.hd_path.as_ref(),
                display_idx,
                page_idx,
                width,
            ),
        }
    }

    /// What gets signed if the parsed message is approved
    pub fn signing_payload(&self) -> Option<SigningPayload> {
        let buf = self.buffering.buffer();
        match self.parsed.as_ref()? {
            Parsed::Transaction { .. } => {
                let mut bytes = Vec::with_capacity(TX_SIGN_PREFIX.len() + buf.len());
                bytes.extend_from_slice(TX_SIGN_PREFIX);
                bytes.extend_from_slice(buf);
                Some(SigningPayload::Transaction(bytes))
            }
            Parsed::ArbitraryData(request) => Some(SigningPayload::ArbitraryData(
                signing_message(buf, request),
            )),
        }
    }

    /// The decoded transaction, when the last parse produced one
    pub fn transaction(&self) -> Option<&DecodedTransaction> {
        match self.parsed.as_ref()? {
            Parsed::Transaction { decoded, .. } => Some(decoded),
            Parsed::ArbitraryData(_) => None,
        }
    }

    pub fn set_blind_signing(&mut self, enabled: bool) {
        self.review.blind_signing = enabled;
    }

    pub fn blind_signing(&self) -> bool {
        self.review.blind_signing
    }

    pub fn set_hd_path(&mut self, path: HdPath) {
        self.hd_path = Some(path);
    }

    pub fn hd_path(&self) -> Option<&HdPath> {
        self.hd_path.as_ref()
    }

    pub fn set_active_public_key(&mut self, key: Address) {
        self.active_key = Some(key);
    }

    pub fn group(&self) -> &GroupSession {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut GroupSession {
        &mut self.group
    }
}
