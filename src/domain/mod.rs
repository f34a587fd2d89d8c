//! Domain types shared by every pipeline stage.
//!
//! # Overview
//!
//! - **Spans** ([`Span`], [`PiiLabel`], [`DetectionSource`]): the single entity
//!   that flows from detection to redaction
//! - **Offsets** ([`CharIndex`]): char/byte mapping for one document
//! - **Errors** ([`RedactError`], [`PredictorError`], [`ExtractionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Fatal failures surface as [`RedactError`]. Per-chunk predictor failures and
//! per-image OCR failures are absorbed by the component that sees them:
//!
//! ```rust
//! use pii_redact::domain::{RedactError, Result};
//!
//! fn decode(bytes: Vec<u8>) -> Result<String> {
//!     Ok(String::from_utf8(bytes)?)
//! }
//!
//! assert!(matches!(decode(vec![0xff]), Err(RedactError::Decode(_))));
//! ```

pub mod errors;
pub mod result;
pub mod span;
pub mod text;

pub use errors::{ExtractionError, PredictorError, RedactError};
pub use result::Result;
pub use span::{DetectionSource, PiiLabel, Span};
pub use text::CharIndex;
