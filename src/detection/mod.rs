//! Deterministic PII detection
//!
//! A TOML pattern library ([`patterns::PatternRegistry`]) compiled once and run
//! by [`regex::PatternDetector`]. Every match is reported with the family's
//! confidence (1.0 for the built-in library); no overlap handling happens here.

pub mod patterns;
pub mod regex;

pub use patterns::{CompiledPattern, PatternRegistry};
pub use regex::PatternDetector;
