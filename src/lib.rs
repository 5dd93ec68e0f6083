//! Algorand Ledger Transaction Review - decode signing requests into paged review screens
//!

pub mod cli;
pub mod config;
pub mod crypto;
pub mod decoder;
pub mod errors;
pub mod session;
pub mod types;
pub mod utils;
