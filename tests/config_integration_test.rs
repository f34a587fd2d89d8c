//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use pii_redact::config::{load_config, PredictorBackend, RedactConfig};
use pii_redact::domain::RedactError;
use pii_redact::model::DisabledPredictor;
use pii_redact::pipeline::RedactionEngine;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("PII_REDACT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PII_REDACT_PREDICTOR_ENDPOINT");
    std::env::remove_var("PII_REDACT_DETECTION_CHUNK_SIZE");
    std::env::remove_var("PII_REDACT_DETECTION_PLACEHOLDER");
    std::env::remove_var("TEST_HF_TOKEN");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_HF_TOKEN", "hf_secret_token");

    let file = write_config(
        r#"
[application]
log_level = "debug"

[predictor]
backend = "http"
endpoint = "https://inference.example.com/models/ner"
api_token = "${TEST_HF_TOKEN}"
timeout_seconds = 30
model = "custom-ner"

[detection]
chunk_size = 400
chunk_overlap = 40
placeholder = "<PII>"

[pdf]
ocr_enabled = false
lines_per_page = 40

[audit]
enabled = true
log_path = "/tmp/pii-redact-test-audit.jsonl"

[logging]
local_enabled = false
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.predictor.backend, PredictorBackend::Http);
    assert_eq!(
        config.predictor.endpoint.as_deref(),
        Some("https://inference.example.com/models/ner")
    );
    assert_eq!(
        config
            .predictor
            .api_token
            .as_ref()
            .map(|t| t.expose_secret().to_string()),
        Some("hf_secret_token".to_string())
    );
    assert_eq!(config.predictor.timeout_seconds, 30);
    assert_eq!(config.predictor.model, "custom-ner");
    assert_eq!(config.detection.chunk_size, 400);
    assert_eq!(config.detection.chunk_overlap, 40);
    assert_eq!(config.detection.placeholder, "<PII>");
    assert!(!config.pdf.ocr_enabled);
    assert_eq!(config.pdf.lines_per_page, 40);
    assert!(config.audit.enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    cleanup_env_vars();
}

#[test]
fn test_empty_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.predictor.backend, PredictorBackend::Disabled);
    assert_eq!(config.detection.chunk_size, 500);
    assert_eq!(config.detection.chunk_overlap, 50);
    assert_eq!(config.detection.placeholder, "[REDACTED]");
    assert_eq!(config.pdf.lines_per_page, 50);
}

#[test]
fn test_missing_env_var_is_config_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[predictor]
backend = "http"
endpoint = "https://inference.example.com"
api_token = "${TEST_HF_TOKEN}"
"#,
    );

    let result = load_config(file.path());
    assert!(matches!(result, Err(RedactError::Configuration(_))));
}

#[test]
fn test_env_overrides_file_values() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PII_REDACT_DETECTION_CHUNK_SIZE", "300");
    std::env::set_var("PII_REDACT_APPLICATION_LOG_LEVEL", "warn");

    let file = write_config("[detection]\nchunk_size = 600\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.detection.chunk_size, 300);
    assert_eq!(config.application.log_level, "warn");

    cleanup_env_vars();
}

#[test]
fn test_http_backend_requires_endpoint() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[predictor]\nbackend = \"http\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_placeholder_that_looks_like_pii_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[detection]\nplaceholder = \"nobody@example.com\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_overlap_must_be_smaller_than_chunk() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[detection]\nchunk_size = 100\nchunk_overlap = 100\n");
    assert!(load_config(file.path()).is_err());
}

#[tokio::test]
async fn test_custom_placeholder_reaches_engine() {
    let mut config = RedactConfig::default();
    config.detection.placeholder = "<PII>".to_string();
    let engine = RedactionEngine::from_config(&config, Arc::new(DisabledPredictor)).unwrap();

    let redacted = engine.mask_text("write to a@example.com").await.unwrap();
    assert_eq!(redacted, "write to <PII>");
}
