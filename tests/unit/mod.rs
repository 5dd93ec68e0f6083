//! Unit Tests Module
//!
//! Cross-module properties of the msgpack reader and the transaction decoder
//! that are easier to state against encoded fixtures than inside the crate.

pub mod key_seek;
pub mod wire_primitives;
