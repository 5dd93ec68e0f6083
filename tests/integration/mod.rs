//! Integration Tests Module
//!
//! End-to-end review flows: a message is chunked into a session, parsed and
//! paged through exactly as the transport and UI layers would.

pub mod application_call;
pub mod arbitrary_data;
pub mod key_registration;
pub mod payment;
pub mod session_lifecycle;
