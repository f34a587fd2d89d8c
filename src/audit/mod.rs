//! Audit logging
//!
//! One JSON line per processed document. Span values are stored as SHA-256
//! hashes only.

pub mod logger;

pub use logger::{hash_value, AuditLogger};
