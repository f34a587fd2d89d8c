//! Configuration management
//!
//! TOML configuration with `${VAR}` substitution, `PII_REDACT_*` environment
//! overrides and validation on load. Every section is optional; without a
//! file the tool runs pattern-only detection.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [predictor]
//! backend = "http"
//! endpoint = "https://api-inference.huggingface.co/models/dslim/bert-base-NER"
//! api_token = "${HF_API_TOKEN}"
//! timeout_seconds = 60
//!
//! [detection]
//! chunk_size = 500
//! chunk_overlap = 50
//! placeholder = "[REDACTED]"
//!
//! [pdf]
//! ocr_enabled = true
//! tesseract_command = "tesseract"
//! lines_per_page = 50
//!
//! [audit]
//! enabled = true
//! log_path = "audit/pii-redact.jsonl"
//! ```
//!
//! ```rust,no_run
//! use pii_redact::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pii-redact.toml")?;
//! println!("Predictor backend: {}", config.predictor.backend);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_default_config, parse_config};
pub use schema::{
    ApplicationConfig, AuditConfig, DetectionConfig, LoggingConfig, PdfConfig, PredictorBackend,
    PredictorConfig, RedactConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
