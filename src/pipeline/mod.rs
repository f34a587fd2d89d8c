//! Redaction pipeline
//!
//! ```text
//! text ──┬─> PatternDetector ──┐
//!        └─> ModelAdapter ─────┴─> reconcile ─> Redactor ─> redacted text
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pii_redact::model::DisabledPredictor;
//! use pii_redact::pipeline::RedactionEngine;
//! use std::sync::Arc;
//!
//! # async fn example() -> pii_redact::domain::Result<()> {
//! let engine = RedactionEngine::new(Arc::new(DisabledPredictor))?;
//! let redacted = engine.mask_text("Reach me at jane@example.com").await?;
//! assert_eq!(redacted, "Reach me at [REDACTED]");
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod reconciler;
pub mod redactor;
pub mod report;

pub use engine::{mask_text, RedactionEngine};
pub use reconciler::{merge_adjacent, reconcile, resolve_overlaps};
pub use redactor::{Redactor, DEFAULT_PLACEHOLDER};
pub use report::{PdfRedaction, RedactionOutcome, RedactionReport};
