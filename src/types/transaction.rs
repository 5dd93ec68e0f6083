//! Decoded Algorand transaction record
//!
//! The record is fixed-size: every collection is an [`ArrayVec`] sized to the
//! limits enforced on the device, and program/argument bytes are kept as
//! length plus SHA-256 digest rather than copied.

use arrayvec::ArrayVec;

/// Raw ed25519 public key / account address
pub type Address = [u8; 32];

pub const ZERO_ADDRESS: Address = [0u8; 32];

// Header limits
pub const MAX_GENESIS_ID_LEN: usize = 32;
pub const MAX_NOTE_LEN: usize = 512;

// Asset params
pub const MAX_UNIT_NAME_LEN: usize = 8;
pub const MAX_ASSET_NAME_LEN: usize = 32;
pub const MAX_ASSET_URL_LEN: usize = 32;
pub const MAX_ASSET_DECIMALS: u8 = 19;
pub const MAX_ASSET_PARAMS: u16 = 12;

// Application call limits
pub const MAX_ACCOUNTS: usize = 4;
pub const MAX_FOREIGN_APPS: usize = 8;
pub const MAX_FOREIGN_ASSETS: usize = 8;
/// Accounts, foreign apps and foreign assets together
pub const ACCT_FOREIGN_LIMIT: usize = 8;
pub const MAX_BOXES: usize = 8;
pub const MAX_BOX_NAME_LEN: usize = 64;
pub const MAX_ARGS: usize = 16;
/// Per argument and for all arguments together
pub const MAX_ARG_LEN: usize = 2048;
pub const PAGE_LEN: usize = 2048;
pub const MAX_EXTRA_PAGES: u8 = 3;
pub const MAX_PROGRAM_LEN: usize = PAGE_LEN * (1 + MAX_EXTRA_PAGES as usize);

/// The six transaction kinds the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    Payment,
    KeyRegistration,
    AssetTransfer,
    AssetFreeze,
    AssetConfig,
    ApplicationCall,
}

impl TxKind {
    /// Map the wire `type` string onto a kind
    pub fn from_wire(tag: &[u8]) -> Option<Self> {
        match tag {
            b"pay" => Some(TxKind::Payment),
            b"keyreg" => Some(TxKind::KeyRegistration),
            b"axfer" => Some(TxKind::AssetTransfer),
            b"afrz" => Some(TxKind::AssetFreeze),
            b"acfg" => Some(TxKind::AssetConfig),
            b"appl" => Some(TxKind::ApplicationCall),
            _ => None,
        }
    }

    /// Label shown on the first review screen
    pub fn label(&self) -> &'static str {
        match self {
            TxKind::Payment => "Payment",
            TxKind::KeyRegistration => "Key Registration",
            TxKind::AssetTransfer => "Asset Transfer",
            TxKind::AssetFreeze => "Asset Freeze",
            TxKind::AssetConfig => "Asset Config",
            TxKind::ApplicationCall => "Application",
        }
    }
}

/// Fields shared by every transaction kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxHeader {
    pub sender: Address,
    pub lease: Option<[u8; 32]>,
    pub rekey: Option<Address>,
    /// microAlgos
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: Option<ArrayVec<u8, MAX_GENESIS_ID_LEN>>,
    pub genesis_hash: [u8; 32],
    pub group_id: Option<[u8; 32]>,
    pub note: Option<ArrayVec<u8, MAX_NOTE_LEN>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payment {
    pub receiver: Address,
    pub amount: u64,
    pub close_to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRegistration {
    pub vote_pk: [u8; 32],
    pub vrf_pk: [u8; 32],
    pub state_proof_pk: [u8; 64],
    pub vote_first: u64,
    pub vote_last: u64,
    pub key_dilution: u64,
    pub non_participation: bool,
}

impl Default for KeyRegistration {
    fn default() -> Self {
        Self {
            vote_pk: [0; 32],
            vrf_pk: [0; 32],
            state_proof_pk: [0; 64],
            vote_first: 0,
            vote_last: 0,
            key_dilution: 0,
            non_participation: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTransfer {
    pub asset_id: u64,
    pub amount: u64,
    /// Clawback source, zero for a regular transfer
    pub sender: Address,
    pub receiver: Address,
    pub close_to: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFreeze {
    pub asset_id: u64,
    pub account: Address,
    pub frozen: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetParams {
    pub total: u64,
    pub default_frozen: bool,
    pub unit_name: ArrayVec<u8, MAX_UNIT_NAME_LEN>,
    pub decimals: u8,
    pub asset_name: ArrayVec<u8, MAX_ASSET_NAME_LEN>,
    pub url: ArrayVec<u8, MAX_ASSET_URL_LEN>,
    pub metadata_hash: [u8; 32],
    pub manager: Address,
    pub reserve: Address,
    pub freeze: Address,
    pub clawback: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetConfig {
    /// Zero when the transaction creates a new asset
    pub asset_id: u64,
    pub params: AssetParams,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnCompletion {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApp,
    DeleteApp,
}

impl OnCompletion {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(OnCompletion::NoOp),
            1 => Some(OnCompletion::OptIn),
            2 => Some(OnCompletion::CloseOut),
            3 => Some(OnCompletion::ClearState),
            4 => Some(OnCompletion::UpdateApp),
            5 => Some(OnCompletion::DeleteApp),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OnCompletion::NoOp => "NoOp",
            OnCompletion::OptIn => "OptIn",
            OnCompletion::CloseOut => "CloseOut",
            OnCompletion::ClearState => "ClearState",
            OnCompletion::UpdateApp => "UpdateApp",
            OnCompletion::DeleteApp => "DeleteApp",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSchema {
    pub num_uint: u64,
    pub num_byteslice: u64,
}

/// Box reference: index into the foreign apps (0 is the called app) plus name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxRef {
    pub app_index: u8,
    pub name: ArrayVec<u8, MAX_BOX_NAME_LEN>,
}

/// Length and SHA-256 digest of a byte field too large to keep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Digest {
    pub len: usize,
    pub sha256: [u8; 32],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationCall {
    pub app_id: u64,
    pub on_completion: OnCompletion,
    pub boxes: ArrayVec<BoxRef, MAX_BOXES>,
    pub accounts: ArrayVec<Address, MAX_ACCOUNTS>,
    pub foreign_apps: ArrayVec<u64, MAX_FOREIGN_APPS>,
    pub foreign_assets: ArrayVec<u64, MAX_FOREIGN_ASSETS>,
    pub args: ArrayVec<Digest, MAX_ARGS>,
    pub global_schema: StateSchema,
    pub local_schema: StateSchema,
    pub extra_pages: u8,
    pub approval_program: Digest,
    pub clear_program: Digest,
}

/// Kind-specific payload; exactly one is active per transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPayload {
    Payment(Payment),
    KeyRegistration(KeyRegistration),
    AssetTransfer(AssetTransfer),
    AssetFreeze(AssetFreeze),
    AssetConfig(AssetConfig),
    ApplicationCall(ApplicationCall),
}

impl TxPayload {
    pub fn kind(&self) -> TxKind {
        match self {
            TxPayload::Payment(_) => TxKind::Payment,
            TxPayload::KeyRegistration(_) => TxKind::KeyRegistration,
            TxPayload::AssetTransfer(_) => TxKind::AssetTransfer,
            TxPayload::AssetFreeze(_) => TxKind::AssetFreeze,
            TxPayload::AssetConfig(_) => TxKind::AssetConfig,
            TxPayload::ApplicationCall(_) => TxKind::ApplicationCall,
        }
    }
}

/// A fully decoded transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub header: TxHeader,
    pub payload: TxPayload,
}

impl Transaction {
    pub fn kind(&self) -> TxKind {
        self.payload.kind()
    }
}
