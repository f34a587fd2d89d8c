//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the pii-redact configuration file.

use super::{load_settings, DEFAULT_CONFIG_FILE, EXIT_CONFIG, EXIT_OK};
use crate::config::{PredictorBackend, RedactConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown = config_path.unwrap_or(DEFAULT_CONFIG_FILE);
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration file: {shown}");
        println!();

        // Loading validates as well
        let config = match load_settings(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);
        Ok(EXIT_OK)
    }
}

fn print_summary(config: &RedactConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Predictor Backend: {}", config.predictor.backend);
    if config.predictor.backend == PredictorBackend::Http {
        println!(
            "  Predictor Endpoint: {}",
            config.predictor.endpoint.as_deref().unwrap_or("-")
        );
        println!("  Model: {}", config.predictor.model);
        println!(
            "  API Token: {}",
            if config.predictor.api_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  Timeout: {}s", config.predictor.timeout_seconds);
    }
    println!(
        "  Chunking: {} chars, {} overlap",
        config.detection.chunk_size, config.detection.chunk_overlap
    );
    println!("  Placeholder: {}", config.detection.placeholder);
    println!(
        "  Pattern Library: {}",
        config
            .detection
            .pattern_library
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );
    println!(
        "  PDF OCR: {}",
        if config.pdf.ocr_enabled {
            config.pdf.tesseract_command.as_str()
        } else {
            "disabled"
        }
    );
    println!("  PDF Lines Per Page: {}", config.pdf.lines_per_page);
    println!(
        "  Audit Log: {}",
        if config.audit.enabled {
            config.audit.log_path.display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!();
}
