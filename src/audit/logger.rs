//! Audit logger for redaction operations

use crate::domain::Span;
use crate::pipeline::RedactionOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Audit log entry, one JSON line per document
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    document_id: String,
    kind: &'a str,
    input_chars: usize,
    spans_redacted: usize,
    chunks_failed: usize,
    processing_time_ms: u64,
    spans: Vec<AuditSpan>,
}

/// Audit span entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditSpan {
    label: String,
    start: usize,
    end: usize,
    confidence: f32,
    source: String,
    /// SHA-256 hash of the covered text (never log plaintext PII)
    value_hash: String,
}

/// Append-only JSON-lines audit trail
pub struct AuditLogger {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory
    pub fn new(log_path: impl Into<PathBuf>) -> Result<Self> {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Audit log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Record one processed document
    pub fn log_redaction(&self, kind: &str, outcome: &RedactionOutcome) -> Result<()> {
        let report = &outcome.report;
        let entry = AuditLogEntry {
            timestamp: report.timestamp.to_rfc3339(),
            document_id: report.document_id.to_string(),
            kind,
            input_chars: report.input_chars,
            spans_redacted: report.spans_redacted,
            chunks_failed: report.chunks_failed,
            processing_time_ms: report.processing_time_ms,
            spans: outcome.spans.iter().map(Self::audit_span).collect(),
        };

        self.write_entry(&entry)
    }

    fn audit_span(span: &Span) -> AuditSpan {
        AuditSpan {
            label: span.label.tag().to_string(),
            start: span.start,
            end: span.end,
            confidence: span.confidence,
            source: format!("{:?}", span.source).to_lowercase(),
            value_hash: hash_value(&span.surface),
        }
    }

    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let json_line = serde_json::to_string(entry).context("Failed to serialize audit entry")?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Audit log lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        Ok(())
    }
}

/// SHA-256 of a value, lowercase hex
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DetectionSource, PiiLabel};
    use crate::pipeline::RedactionReport;
    use tempfile::tempdir;

    fn outcome() -> RedactionOutcome {
        let spans = vec![Span::new(
            PiiLabel::Email,
            8,
            24,
            1.0,
            "test@example.com",
            DetectionSource::Pattern,
        )];
        let mut report = RedactionReport::new(30, "disabled");
        report.record_spans(&spans);
        RedactionOutcome {
            text: "Contact [REDACTED] today".to_string(),
            spans,
            report,
        }
    }

    #[test]
    fn test_hash_value() {
        assert_eq!(hash_value("test@example.com"), hash_value("test@example.com"));
        assert_ne!(hash_value("test@example.com"), hash_value("other@example.com"));
        assert_eq!(
            hash_value(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_log_redaction_never_writes_plaintext() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit").join("redactions.jsonl");
        let logger = AuditLogger::new(&log_path).unwrap();

        let outcome = outcome();
        logger.log_redaction("text", &outcome).unwrap();
        logger.log_redaction("text", &outcome).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("test@example.com"));

        let entry: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(entry["kind"], "text");
        assert_eq!(entry["spans"][0]["label"], "EMAIL");
        assert_eq!(entry["spans"][0]["source"], "pattern");
        assert_eq!(entry["spans"][0]["value_hash"], hash_value("test@example.com"));
        assert_eq!(entry["document_id"], outcome.report.document_id.to_string());
    }
}
