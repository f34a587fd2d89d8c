//! Domain error types
//!
//! Errors are split by recoverability. [`RedactError`] is fatal for the
//! current document (or, for [`RedactError::PredictorInit`], for the process).
//! [`PredictorError`] and the per-image variants of [`ExtractionError`] are
//! recovered locally by the component that sees them.

use thiserror::Error;

/// Main error type
///
/// Any value of this type reaching a caller means no redacted output was
/// produced for the document being processed.
#[derive(Debug, Error)]
pub enum RedactError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The predictor could not be constructed; masking cannot proceed
    #[error("Predictor initialization failed: {0}")]
    PredictorInit(String),

    /// Document text extraction failed
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Input bytes could not be decoded as text
    #[error("Decode error: {0}")]
    Decode(String),

    /// Span set could not be applied to the text
    #[error("Redaction error: {0}")]
    Redaction(String),

    /// Audit log errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Failure of a single predictor invocation
///
/// Never fatal: the chunk that produced it contributes zero spans.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(String),

    /// Non-success HTTP status
    #[error("Predictor returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body could not be parsed as predictions
    #[error("Invalid predictor response: {0}")]
    InvalidResponse(String),

    /// Model/backend runtime failure
    #[error("Predictor backend error: {0}")]
    Backend(String),
}

/// Document text extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PDF itself could not be parsed (fatal for the document)
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    /// Embedded image could not be read (recoverable)
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// Embedded image encoding not supported by the OCR engine (recoverable)
    #[error("Unsupported image encoding: {0}")]
    UnsupportedImage(String),

    /// OCR engine failure (recoverable)
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Conversion from std::io::Error
impl From<std::io::Error> for RedactError {
    fn from(err: std::io::Error) -> Self {
        RedactError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RedactError {
    fn from(err: serde_json::Error) -> Self {
        RedactError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RedactError {
    fn from(err: toml::de::Error) -> Self {
        RedactError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<std::string::FromUtf8Error> for RedactError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        RedactError::Decode(format!("input is not valid UTF-8: {err}"))
    }
}
