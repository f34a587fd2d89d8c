//! Scan command implementation
//!
//! Runs detection and prints the final spans and report as JSON. Span values
//! are omitted unless `--show-values` is given.

use super::file::FileKind;
use super::{build_engine, EXIT_CONFIG, EXIT_OK, EXIT_PROCESSING};
use crate::config::RedactConfig;
use crate::domain::{RedactError, Span};
use crate::pipeline::{RedactionEngine, RedactionReport};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Text to scan (reads standard input when neither text nor --file is given)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// File to scan (.txt or .pdf)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Include the detected values in the output
    #[arg(long)]
    pub show_values: bool,
}

#[derive(Debug, Serialize)]
struct ScanSpan<'a> {
    label: &'a str,
    start: usize,
    end: usize,
    confidence: f32,
    source: crate::domain::DetectionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ScanOutput<'a> {
    spans: Vec<ScanSpan<'a>>,
    report: &'a RedactionReport,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config: &RedactConfig) -> anyhow::Result<i32> {
        let engine = match build_engine(config) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize redaction engine");
                eprintln!("❌ Failed to initialize redaction: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let scanned = match self.scan(&engine).await {
            Ok(scanned) => scanned,
            Err(e) => {
                crate::log_error_with_context!(&e, "Scan failed");
                eprintln!("❌ Scan failed: {e}");
                return Ok(EXIT_PROCESSING);
            }
        };

        let (spans, report) = &scanned;
        let output = ScanOutput {
            spans: spans.iter().map(|s| self.scan_span(s)).collect(),
            report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(EXIT_OK)
    }

    async fn scan(&self, engine: &RedactionEngine) -> Result<(Vec<Span>, RedactionReport), RedactError> {
        if let Some(path) = &self.file {
            let bytes = tokio::fs::read(path).await?;
            return match FileKind::from_path(path) {
                Some(FileKind::Pdf) => {
                    let result = engine.redact_pdf_bytes(&bytes).await?;
                    Ok((result.spans, result.report))
                }
                Some(FileKind::Txt) => {
                    let text = String::from_utf8(bytes)?;
                    let outcome = engine.analyze(&text).await?;
                    Ok((outcome.spans, outcome.report))
                }
                None => Err(RedactError::Other(format!(
                    "Unsupported file type: {}",
                    path.display()
                ))),
            };
        }

        let text = match &self.text {
            Some(text) => text.clone(),
            None => {
                let mut buffer = String::new();
                tokio::io::stdin().read_to_string(&mut buffer).await?;
                buffer
            }
        };
        let outcome = engine.analyze(&text).await?;
        Ok((outcome.spans, outcome.report))
    }

    fn scan_span<'a>(&self, span: &'a Span) -> ScanSpan<'a> {
        ScanSpan {
            label: span.label.tag(),
            start: span.start,
            end: span.end,
            confidence: span.confidence,
            source: span.source,
            value: self.show_values.then_some(span.surface.as_str()),
        }
    }
}
