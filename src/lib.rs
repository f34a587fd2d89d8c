// pii-redact - PII detection and redaction for text and PDF documents
// Copyright (c) 2025 pii-redact Contributors
// Licensed under the MIT License

//! # pii-redact
//!
//! Detects personally identifiable information in free text and replaces
//! every occurrence with a placeholder. Text and PDF documents are supported;
//! PDFs are reduced to text (page text layer plus OCR of embedded images) and
//! rebuilt as plain-text PDFs after redaction.
//!
//! ## Overview
//!
//! Two detectors run over every document:
//! - **Pattern detection**: a regex library for emails, phone numbers, SSNs,
//!   card numbers, ZIP codes and dates of birth
//! - **Model detection**: a token-classification predictor run over
//!   overlapping 500-char windows, with per-window failure isolation
//!
//! Their candidates are merged (adjacent same-label fragments joined),
//! overlaps are resolved by confidence, and the survivors are replaced by
//! `[REDACTED]`.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`pipeline`] - Reconciliation, substitution and the [`pipeline::RedactionEngine`]
//! - [`detection`] - Regex pattern library and detector
//! - [`model`] - Predictor trait, backends and chunking adapter
//! - [`document`] - PDF text extraction, OCR and PDF reconstruction
//! - [`audit`] - JSON-lines audit log with hashed values
//! - [`domain`] - Spans, offsets and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_redact::config::load_config;
//! use pii_redact::model::shared_predictor;
//! use pii_redact::pipeline::RedactionEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("pii-redact.toml")?;
//!     let predictor = shared_predictor(&config.predictor)?;
//!     let engine = RedactionEngine::from_config(&config, predictor)?;
//!
//!     let redacted = engine
//!         .mask_text("Contact Jane Doe at jane.doe@example.com or 415-555-1234.")
//!         .await?;
//!     println!("{redacted}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fatal failures are [`domain::RedactError`]. A failing model window or an
//! unreadable embedded image is logged and skipped; the document is still
//! redacted with whatever the remaining detectors found.

pub mod audit;
pub mod cli;
pub mod config;
pub mod detection;
pub mod document;
pub mod domain;
pub mod logging;
pub mod model;
pub mod pipeline;
