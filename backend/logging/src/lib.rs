//! Structured logging for Restock.
//!
//! JSON file output with daily rotation, console output, and scrubbing of
//! credentials before they can reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
