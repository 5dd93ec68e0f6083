//! Display index: the ordered list of fields a user pages through
//!
//! Tags are pushed while decoding, in the order the fields were read. Row 0
//! (the transaction type) is implicit and not stored.

use crate::decoder::error::{ParserError, ParserResult};
use arrayvec::ArrayVec;
use serde::Serialize;

/// Maximum number of stored display tags
pub const MAX_ITEM_ARRAY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonField {
    Sender,
    Lease,
    RekeyTo,
    Fee,
    GenesisId,
    GenesisHash,
    GroupId,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    Receiver,
    Amount,
    CloseTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRegField {
    VotePk,
    VrfPk,
    StateProofPk,
    VoteFirst,
    VoteLast,
    KeyDilution,
    Participating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetTransferField {
    AssetId,
    Amount,
    Receiver,
    Sender,
    CloseTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFreezeField {
    AssetId,
    Account,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetConfigField {
    AssetId,
    Total,
    DefaultFrozen,
    UnitName,
    Decimals,
    AssetName,
    Url,
    MetadataHash,
    Manager,
    Reserve,
    Freezer,
    Clawback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppField {
    AppId,
    OnCompletion,
    Box(u8),
    ForeignApp(u8),
    ForeignAsset(u8),
    Account(u8),
    Arg(u8),
    GlobalSchema,
    LocalSchema,
    ExtraPages,
    ApprovalProgram,
    ClearProgram,
}

/// One displayable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayItem {
    Common(CommonField),
    Payment(PaymentField),
    KeyReg(KeyRegField),
    AssetTransfer(AssetTransferField),
    AssetFreeze(AssetFreezeField),
    AssetConfig(AssetConfigField),
    App(AppField),
}

/// Bounded, ordered list of display tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayIndex {
    items: ArrayVec<DisplayItem, MAX_ITEM_ARRAY>,
}

impl DisplayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag; a full index is a decode error, never a truncation
    pub fn push(&mut self, item: DisplayItem) -> ParserResult<()> {
        self.items
            .try_push(item)
            .map_err(|_| ParserError::DisplayIndexFull)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<DisplayItem> {
        self.items.get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayItem> {
        self.items.iter()
    }

    /// Number of tags in the common block
    pub fn common_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DisplayItem::Common(_)))
            .count()
    }
}

/// A rendered review screen: key, one page of the value, and the page count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayField {
    pub key: String,
    pub value: String,
    pub page_count: u8,
}
