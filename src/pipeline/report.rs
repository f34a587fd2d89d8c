//! Per-document redaction results and statistics

use crate::domain::{DetectionSource, Span};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Statistics for one processed document
///
/// Carries counts and offsets only; never span surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Random per-document identifier
    pub document_id: Uuid,

    /// Processing start
    pub timestamp: DateTime<Utc>,

    /// Input length in chars
    pub input_chars: usize,

    /// Pattern candidates before reconciliation
    pub pattern_candidates: usize,

    /// Model candidates before reconciliation
    pub model_candidates: usize,

    /// Spans redacted
    pub spans_redacted: usize,

    /// Redacted spans by taxonomy tag
    pub by_label: BTreeMap<String, usize>,

    /// Redacted spans by detector
    pub by_source: BTreeMap<String, usize>,

    /// Predictor backend name
    pub predictor: String,

    /// Predictor invocations
    pub chunks_total: usize,

    /// Predictor invocations that failed and were skipped
    pub chunks_failed: usize,

    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

impl RedactionReport {
    /// Empty report for a document of `input_chars` chars
    pub fn new(input_chars: usize, predictor: &str) -> Self {
        Self {
            document_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input_chars,
            pattern_candidates: 0,
            model_candidates: 0,
            spans_redacted: 0,
            by_label: BTreeMap::new(),
            by_source: BTreeMap::new(),
            predictor: predictor.to_string(),
            chunks_total: 0,
            chunks_failed: 0,
            processing_time_ms: 0,
        }
    }

    /// Record the final span set
    pub fn record_spans(&mut self, spans: &[Span]) {
        self.spans_redacted = spans.len();
        for span in spans {
            *self.by_label.entry(span.label.tag().to_string()).or_insert(0) += 1;
            let source = match span.source {
                DetectionSource::Pattern => "pattern",
                DetectionSource::Model => "model",
            };
            *self.by_source.entry(source.to_string()).or_insert(0) += 1;
        }
    }

    /// Whether any chunk failed
    pub fn is_degraded(&self) -> bool {
        self.chunks_failed > 0
    }
}

/// Result of analyzing one text
#[derive(Debug, Clone, Serialize)]
pub struct RedactionOutcome {
    /// Redacted text
    pub text: String,

    /// Final reconciled spans in start order
    pub spans: Vec<Span>,

    /// Statistics
    pub report: RedactionReport,
}

/// Result of redacting one PDF
#[derive(Debug, Clone)]
pub struct PdfRedaction {
    /// Redacted combined text (page text followed by OCR text)
    pub text: String,

    /// Reconstructed plain-text PDF
    pub pdf: Vec<u8>,

    /// Final spans over the combined text
    pub spans: Vec<Span>,

    /// Pages in the source document
    pub source_pages: usize,

    /// OCR fragments contributing text
    pub ocr_fragments: usize,

    /// Statistics for the combined text
    pub report: RedactionReport,
}
