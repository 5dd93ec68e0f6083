//! Decoder-specific error types
//!
//! Every failure the decoder can report is a variant of [`ParserError`]. The
//! `#[error]` text doubles as the human-readable description that is copied into
//! the reply for the host application, so keep it short.

use serde::Serialize;

/// Result type for decoder operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Generic "data invalid" status, used for everything without a dedicated code
pub const STATUS_DATA_INVALID: u16 = 0x6984;

/// Status codes for the arbitrary-data family
pub const STATUS_INVALID_SCOPE: u16 = 0x6988;
pub const STATUS_FAILED_DECODING: u16 = 0x6989;
pub const STATUS_INVALID_SIGNER: u16 = 0x698A;
pub const STATUS_MISSING_DOMAIN: u16 = 0x698B;
pub const STATUS_MISSING_AUTHENTICATED_DATA: u16 = 0x698C;
pub const STATUS_BAD_JSON: u16 = 0x698D;
pub const STATUS_FAILED_DOMAIN_AUTH: u16 = 0x698E;
pub const STATUS_FAILED_HD_PATH: u16 = 0x698F;

/// Decoder error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    // Generic
    #[error("No more data")]
    NoData,

    #[error("Initialized empty context")]
    InitContextEmpty,

    #[error("Unexpected buffer end")]
    UnexpectedBufferEnd,

    #[error("Value out of range")]
    ValueOutOfRange,

    #[error("Display page out of range")]
    DisplayPageOutOfRange,

    #[error("Unexpected error")]
    UnexpectedError,

    #[error("Blind signing mode required")]
    BlindsignModeRequired,

    // Semantic
    #[error("Unexpected value")]
    UnexpectedValue,

    #[error("Unexpected number of items")]
    UnexpectedNumberItems,

    #[error("Unexpected key")]
    UnexpectedKey,

    #[error("Missing field {0}")]
    MissingField(&'static str),

    #[error("Unknown transaction type")]
    UnknownTransaction,

    #[error("Program fields too long")]
    ProgramFieldsTooLong,

    #[error("Too many extra pages")]
    TooManyExtraPages,

    #[error("Transaction field out of order")]
    FieldOutOfOrder,

    // Capacity
    #[error("Too many display items")]
    DisplayIndexFull,

    #[error("Msgpack nesting too deep")]
    NestingTooDeep,

    #[error("Group transaction count exceeded")]
    GroupTxnOverflow,

    #[error("Transaction buffer full")]
    BufferFull,

    // Wire format
    #[error("Msgpack map type expected")]
    MapTypeExpected,

    #[error("Msgpack map type not suported")]
    MapTypeNotSupported,

    #[error("Msgpack string type expected")]
    StrTypeExpected,

    #[error("Msgpack string type not supported")]
    StrTypeNotSupported,

    #[error("Msgpack string too big")]
    StrTooBig,

    #[error("Msgpack bin type expected")]
    BinTypeExpected,

    #[error("Msgpack bin type not supported")]
    BinTypeNotSupported,

    #[error("Msgpack bin unexpected size")]
    BinUnexpectedSize,

    #[error("Msgpack int type expected")]
    IntTypeExpected,

    #[error("Msgpack bool type expected")]
    BoolTypeExpected,

    #[error("Msgpack array type expected")]
    ArrayTypeExpected,

    #[error("Msgpack array type not supported")]
    ArrayTypeNotSupported,

    // Arbitrary data
    #[error("Invalid Scope")]
    InvalidScope,

    #[error("Invalid Encoding")]
    InvalidEncoding,

    #[error("Failed to decode")]
    FailedDecoding,

    #[error("Invalid Signer")]
    InvalidSigner,

    #[error("Missing Domain")]
    MissingDomain,

    #[error("Invalid Domain")]
    InvalidDomain,

    #[error("Invalid Request ID")]
    InvalidRequestId,

    #[error("Missing Authentication Data")]
    MissingAuthenticatedData,

    #[error("Bad JSON")]
    BadJson,

    #[error("Failed Domain Auth")]
    FailedDomainAuth,

    #[error("Failed HD Path")]
    FailedHdPath,
}

/// What the transport layer sends back when a parse fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub status_code: u16,
    pub message: Option<String>,
}

impl ParserError {
    /// Map the error onto the externally visible status-code table
    pub fn status_code(&self) -> u16 {
        match self {
            ParserError::InvalidScope => STATUS_INVALID_SCOPE,
            ParserError::FailedDecoding => STATUS_FAILED_DECODING,
            ParserError::InvalidSigner => STATUS_INVALID_SIGNER,
            ParserError::MissingDomain => STATUS_MISSING_DOMAIN,
            ParserError::MissingAuthenticatedData => STATUS_MISSING_AUTHENTICATED_DATA,
            ParserError::BadJson => STATUS_BAD_JSON,
            ParserError::FailedDomainAuth => STATUS_FAILED_DOMAIN_AUTH,
            ParserError::FailedHdPath => STATUS_FAILED_HD_PATH,
            _ => STATUS_DATA_INVALID,
        }
    }

    /// Errors raised while paging through an already accepted review.
    ///
    /// These never describe the user's data, so no message is attached to them.
    pub fn is_display_error(&self) -> bool {
        matches!(
            self,
            ParserError::NoData | ParserError::DisplayPageOutOfRange
        )
    }

    /// Build the reply for the host: status code plus, for data errors, the description
    pub fn reply(&self) -> ErrorReply {
        ErrorReply {
            status_code: self.status_code(),
            message: if self.is_display_error() {
                None
            } else {
                Some(self.to_string())
            },
        }
    }
}
