//! File command implementation
//!
//! Redacts a `.txt` or `.pdf` file. Text files are written to `--output` or
//! standard output; PDFs are rebuilt as plain-text PDFs next to the input
//! (or at `--output`) and their redacted text is printed.

use super::{build_engine, EXIT_CONFIG, EXIT_OK, EXIT_PROCESSING};
use crate::config::RedactConfig;
use crate::domain::RedactError;
use crate::pipeline::RedactionEngine;
use clap::Args;
use std::path::{Path, PathBuf};

/// Supported input formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// UTF-8 text
    Txt,
    /// PDF document
    Pdf,
}

impl FileKind {
    /// Format of `path`, if supported
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Arguments for the file command
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Input file (.txt or .pdf)
    pub path: PathBuf,

    /// Output path (PDF default: redacted_<name> beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl FileArgs {
    /// Execute the file command
    pub async fn execute(&self, config: &RedactConfig) -> anyhow::Result<i32> {
        tracing::info!(path = %self.path.display(), "Redacting file");

        let Some(kind) = FileKind::from_path(&self.path) else {
            eprintln!(
                "❌ Unsupported file type: {} (expected .txt or .pdf)",
                self.path.display()
            );
            return Ok(EXIT_PROCESSING);
        };

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("❌ Failed to read {}: {e}", self.path.display());
                return Ok(EXIT_PROCESSING);
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

        let result = match kind {
            FileKind::Txt => self.redact_txt(&engine, &bytes).await,
            FileKind::Pdf => self.redact_pdf(&engine, &bytes).await,
        };

        match result {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => {
                crate::log_error_with_context!(&e, "File redaction failed");
                eprintln!("❌ Failed to redact {}: {e}", self.path.display());
                Ok(EXIT_PROCESSING)
            }
        }
    }

    async fn redact_txt(&self, engine: &RedactionEngine, bytes: &[u8]) -> Result<(), RedactError> {
        let redacted = engine.redact_txt_bytes(bytes).await?;
        match &self.output {
            Some(output) => {
                tokio::fs::write(output, redacted.as_bytes()).await?;
                println!("✅ Redacted text written to {}", output.display());
            }
            None => print!("{redacted}"),
        }
        Ok(())
    }

    async fn redact_pdf(&self, engine: &RedactionEngine, bytes: &[u8]) -> Result<(), RedactError> {
        let result = engine.redact_pdf_bytes(bytes).await?;
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.path));
        tokio::fs::write(&output, &result.pdf).await?;

        println!("{}", result.text);
        println!(
            "✅ Redacted PDF written to {} ({} source pages, {} image fragments, {} spans)",
            output.display(),
            result.source_pages,
            result.ocr_fragments,
            result.report.spans_redacted
        );
        Ok(())
    }
}

/// `redacted_<file name>` in the input's directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("redacted_{name}"))
}
