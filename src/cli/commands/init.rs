//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{DEFAULT_CONFIG_FILE, EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing pii-redact configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. For model detection set backend = \"http\" and the endpoint");
                println!("  3. Put the API token in a .env file as HF_API_TOKEN");
                println!("  4. Validate configuration: pii-redact validate-config");
                println!("  5. Redact: pii-redact file <document.pdf>");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# pii-redact configuration

[application]
log_level = "info"

[predictor]
backend = "disabled"  # http | disabled
# endpoint = "https://api-inference.huggingface.co/models/dslim/bert-base-NER"
# api_token = "${HF_API_TOKEN}"

[detection]
chunk_size = 500
chunk_overlap = 50
placeholder = "[REDACTED]"

[pdf]
ocr_enabled = true
tesseract_command = "tesseract"
lines_per_page = 50

[audit]
enabled = false
log_path = "pii-redact-audit.jsonl"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# pii-redact configuration
#
# Every section is optional. Without a predictor only the regex pattern
# library runs. Any value can be overridden with PII_REDACT_<SECTION>_<KEY>,
# e.g. PII_REDACT_PREDICTOR_ENDPOINT.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Model Predictor
# ============================================================================
[predictor]
# Backend: "http" (token-classification inference endpoint) or "disabled"
backend = "http"

# Inference endpoint receiving {"inputs": "<text>"}
endpoint = "https://api-inference.huggingface.co/models/dslim/bert-base-NER"

# Bearer token (use environment variable)
api_token = "${HF_API_TOKEN}"

# Request timeout in seconds
timeout_seconds = 60

# Model name reported in logs and reports
model = "dslim/bert-base-NER"

# ============================================================================
# Detection
# ============================================================================
[detection]
# Model window size in characters
chunk_size = 500

# Characters shared by consecutive windows (must be smaller than chunk_size)
chunk_overlap = 50

# Replacement for every detected span (must not itself look like PII)
placeholder = "[REDACTED]"

# Optional: custom pattern library replacing the built-in one
# pattern_library = "patterns/pii_patterns.toml"

# ============================================================================
# PDF Handling
# ============================================================================
[pdf]
# Run OCR on embedded images
ocr_enabled = true

# Tesseract executable
tesseract_command = "tesseract"

# Lines of redacted text per page of the rebuilt PDF
lines_per_page = 50

# ============================================================================
# Audit Log
# ============================================================================
[audit]
# Append one JSON line per document (values are stored as SHA-256 hashes)
enabled = true
log_path = "audit/pii-redact.jsonl"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Log directory
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
