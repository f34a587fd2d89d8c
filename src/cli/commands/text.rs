//! Text command implementation
//!
//! Redacts a text passed on the command line, or standard input when no
//! argument is given, and writes the result to standard output.

use super::{build_engine, EXIT_CONFIG, EXIT_OK, EXIT_PROCESSING};
use crate::config::RedactConfig;
use clap::Args;
use tokio::io::AsyncReadExt;

/// Arguments for the text command
#[derive(Args, Debug)]
pub struct TextArgs {
    /// Text to redact (reads standard input when omitted)
    pub text: Option<String>,
}

impl TextArgs {
    /// Execute the text command
    pub async fn execute(&self, config: &RedactConfig) -> anyhow::Result<i32> {
        let input = match &self.text {
            Some(text) => text.clone(),
            None => {
                let mut buffer = String::new();
                tokio::io::stdin().read_to_string(&mut buffer).await?;
                buffer
            }
        };

        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize redaction engine");
                eprintln!("❌ Failed to initialize redaction: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match engine.mask_text(&input).await {
            Ok(redacted) => {
                println!("{redacted}");
                Ok(EXIT_OK)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Text redaction failed");
                eprintln!("❌ Redaction failed: {e}");
                Ok(EXIT_PROCESSING)
            }
        }
    }
}
