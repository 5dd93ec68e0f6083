//! Decoder for Algorand Ledger signing requests
//!
//! Turns a buffered message into a typed record plus an ordered list of
//! review rows. Two message kinds are understood:
//!
//! - msgpack-encoded transactions (payment, key registration, the three asset
//!   kinds and application calls)
//! - arbitrary-data authentication requests carrying a JSON payload
//!
//! Key Features:
//! - Bounds-checked msgpack primitives with exact-width error reporting
//! - Order-independent field lookup, unknown fields ignored
//! - Fixed-capacity records; every limit is a decode error, never a truncation
//! - Paged rendering of each review row on demand

pub mod arbitrary;
pub mod display;
pub mod error;
pub mod json_index;
pub mod reader;
pub mod transaction;
pub mod validator;

pub use arbitrary::{decode_arbitrary, signing_message};
pub use error::{ErrorReply, ParserError, ParserResult};
pub use transaction::{decode_transaction, DecodedTransaction};
pub use validator::{validate, Canary};
