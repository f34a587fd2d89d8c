//! Logging and observability
//!
//! Structured logging via `tracing`. Document text and span surfaces are
//! never logged; spans are described by label and offsets only.
//!
//! # Example
//!
//! ```no_run
//! use pii_redact::logging::init_logging;
//! use pii_redact::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a finished document
///
/// # Example
///
/// ```no_run
/// use pii_redact::log_document_redacted;
/// use std::time::Duration;
///
/// log_document_redacted!("txt", 3, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_document_redacted {
    ($kind:expr, $spans:expr, $duration:expr) => {
        tracing::info!(
            kind = $kind,
            spans = $spans,
            duration_ms = $duration.as_millis() as u64,
            "Document redacted"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use pii_redact::log_error_with_context;
/// use pii_redact::domain::RedactError;
///
/// let error = RedactError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
