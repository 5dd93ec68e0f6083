//! Algorand transaction review - type system
//!
//! - `transaction`: decoded transaction record and wire limits
//! - `display`: display index tags and rendered fields
//! - `arbitrary`: arbitrary-data signing request
//! - `assets`: static table of well-known ASAs

pub mod arbitrary;
pub mod assets;
pub mod display;
pub mod transaction;

pub use arbitrary::ArbitraryData;
pub use display::{DisplayField, DisplayIndex, DisplayItem};
pub use transaction::{Address, Transaction, TxHeader, TxKind, TxPayload};
