//! Configuration schema types

use crate::config::SecretString;
use crate::detection::PatternRegistry;
use crate::model::adapter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, maps to the TOML file
///
/// Every section is optional; `RedactConfig::default()` runs pattern-only
/// detection with console logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Model predictor backend
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Detection and redaction settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// PDF extraction and rendering
    #[serde(default)]
    pub pdf: PdfConfig,

    /// Audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RedactConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.predictor.validate()?;
        self.detection.validate()?;
        self.pdf.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Predictor backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PredictorBackend {
    /// Hosted token-classification endpoint
    Http,
    /// No model; pattern detection only
    #[default]
    Disabled,
}

impl std::fmt::Display for PredictorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictorBackend::Http => write!(f, "http"),
            PredictorBackend::Disabled => write!(f, "disabled"),
        }
    }
}

/// Model predictor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: PredictorBackend,

    /// Inference endpoint URL (required for `http`)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Request timeout per chunk
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Model identifier, used in logs and reports
    #[serde(default = "default_model")]
    pub model: String,
}

impl PredictorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("predictor.timeout_seconds must be > 0".to_string());
        }

        if self.backend == PredictorBackend::Http {
            let endpoint = self
                .endpoint
                .as_deref()
                .filter(|e| !e.is_empty())
                .ok_or_else(|| "predictor.endpoint is required when backend = 'http'".to_string())?;

            let url = url::Url::parse(endpoint)
                .map_err(|e| format!("Invalid predictor.endpoint '{endpoint}': {e}"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "predictor.endpoint must use http or https, got '{}'",
                    url.scheme()
                ));
            }
        }

        Ok(())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            backend: PredictorBackend::default(),
            endpoint: None,
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
            model: default_model(),
        }
    }
}

/// Detection and redaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Predictor window length in chars
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive windows in chars
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Literal substituted for every redacted span
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Replacement pattern library (TOML); built-in library when unset
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,
}

impl DetectionConfig {
    /// Load the pattern library this configuration selects
    pub fn pattern_registry(&self) -> anyhow::Result<PatternRegistry> {
        match self.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("detection.chunk_size must be > 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "detection.chunk_overlap ({}) must be smaller than detection.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }
        if self.placeholder.is_empty() {
            return Err("detection.placeholder cannot be empty".to_string());
        }

        let registry = self
            .pattern_registry()
            .map_err(|e| format!("Invalid detection.pattern_library: {e:#}"))?;
        if registry.matches_any(&self.placeholder) {
            return Err(format!(
                "detection.placeholder '{}' matches a detector pattern; redacted output would be re-detected",
                self.placeholder
            ));
        }

        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            placeholder: default_placeholder(),
            pattern_library: None,
        }
    }
}

/// PDF extraction and rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Run OCR over embedded images
    #[serde(default = "default_true")]
    pub ocr_enabled: bool,

    /// Tesseract executable
    #[serde(default = "default_tesseract_command")]
    pub tesseract_command: String,

    /// Lines of redacted text per reconstructed page
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
}

impl PdfConfig {
    fn validate(&self) -> Result<(), String> {
        if self.lines_per_page == 0 {
            return Err("pdf.lines_per_page must be > 0".to_string());
        }
        if self.ocr_enabled && self.tesseract_command.trim().is_empty() {
            return Err("pdf.tesseract_command cannot be empty when OCR is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            tesseract_command: default_tesseract_command(),
            lines_per_page: default_lines_per_page(),
        }
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Write one JSON line per processed document
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file
    #[serde(default = "default_audit_path")]
    pub log_path: PathBuf,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_model() -> String {
    "dslim/bert-base-NER".to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

fn default_placeholder() -> String {
    crate::pipeline::redactor::DEFAULT_PLACEHOLDER.to_string()
}

fn default_tesseract_command() -> String {
    "tesseract".to_string()
}

fn default_lines_per_page() -> usize {
    50
}

fn default_audit_path() -> PathBuf {
    PathBuf::from("pii-redact-audit.jsonl")
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RedactConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.predictor.backend, PredictorBackend::Disabled);
        assert_eq!(config.detection.chunk_size, 500);
        assert_eq!(config.detection.chunk_overlap, 50);
        assert_eq!(config.detection.placeholder, "[REDACTED]");
        assert_eq!(config.pdf.lines_per_page, 50);
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_backend_requires_valid_endpoint() {
        let mut config = PredictorConfig {
            backend: PredictorBackend::Http,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.endpoint = Some("https://api-inference.huggingface.co/models/dslim/bert-base-NER".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_detection_overlap_must_be_smaller_than_chunk() {
        let config = DetectionConfig {
            chunk_size: 100,
            chunk_overlap: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_placeholder_matching_a_pattern_is_rejected() {
        let config = DetectionConfig {
            placeholder: "000-00-0000".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("matches a detector pattern"));

        let config = DetectionConfig {
            placeholder: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: RedactConfig = toml::from_str(
            r#"
[predictor]
backend = "http"
endpoint = "http://localhost:8080/"
"#,
        )
        .unwrap();
        assert_eq!(config.predictor.backend, PredictorBackend::Http);
        assert_eq!(config.predictor.timeout_seconds, 60);
        assert_eq!(config.application.log_level, "info");
        assert!(config.validate().is_ok());
    }
}
