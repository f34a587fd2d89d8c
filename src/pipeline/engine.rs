//! Redaction engine: detection, reconciliation and substitution for one
//! document at a time

use super::reconciler::reconcile;
use super::redactor::Redactor;
use super::report::{PdfRedaction, RedactionOutcome, RedactionReport};
use crate::audit::AuditLogger;
use crate::config::RedactConfig;
use crate::detection::PatternDetector;
use crate::document::{
    render_text_pdf, DocumentTextExtractor, ImageOcr, LopdfExtractor, NoOcr, RenderSettings,
    TesseractOcr,
};
use crate::domain::{CharIndex, RedactError, Result, Span};
use crate::model::{ModelAdapter, Predictor};
use std::sync::Arc;
use std::time::Instant;

/// Document-level redaction entry points
///
/// Holds the shared read-only predictor plus everything built once from
/// configuration. Each call is independent; no state carries over between
/// documents except audit log lines.
pub struct RedactionEngine {
    predictor: Arc<dyn Predictor>,
    detector: PatternDetector,
    adapter: ModelAdapter,
    redactor: Redactor,
    extractor: Arc<dyn DocumentTextExtractor>,
    render: RenderSettings,
    audit: Option<AuditLogger>,
}

impl RedactionEngine {
    /// Engine with default settings around `predictor`
    pub fn new(predictor: Arc<dyn Predictor>) -> Result<Self> {
        Self::from_config(&RedactConfig::default(), predictor)
    }

    /// Engine configured from `config`
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::Configuration`] for an unusable pattern
    /// library or chunk settings and [`RedactError::Audit`] if the audit log
    /// cannot be prepared.
    pub fn from_config(config: &RedactConfig, predictor: Arc<dyn Predictor>) -> Result<Self> {
        let registry = config
            .detection
            .pattern_registry()
            .map_err(|e| RedactError::Configuration(format!("{e:#}")))?;
        let adapter = ModelAdapter::new(config.detection.chunk_size, config.detection.chunk_overlap)?;

        let ocr: Arc<dyn ImageOcr> = if config.pdf.ocr_enabled {
            Arc::new(TesseractOcr::new(config.pdf.tesseract_command.clone()))
        } else {
            Arc::new(NoOcr)
        };

        let audit = if config.audit.enabled {
            Some(
                AuditLogger::new(&config.audit.log_path)
                    .map_err(|e| RedactError::Audit(format!("{e:#}")))?,
            )
        } else {
            None
        };

        tracing::debug!(
            predictor = predictor.name(),
            patterns = registry.all_patterns().len(),
            chunk_size = adapter.chunk_size(),
            chunk_overlap = adapter.chunk_overlap(),
            ocr = ocr.name(),
            audit = audit.is_some(),
            "Redaction engine configured"
        );

        Ok(Self {
            predictor,
            detector: PatternDetector::with_registry(registry),
            adapter,
            redactor: Redactor::new(config.detection.placeholder.clone()),
            extractor: Arc::new(LopdfExtractor::new(ocr)),
            render: RenderSettings::with_lines_per_page(config.pdf.lines_per_page),
            audit,
        })
    }

    /// Replace the PDF text extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentTextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Attach an audit logger
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Predictor in use
    pub fn predictor(&self) -> &Arc<dyn Predictor> {
        &self.predictor
    }

    /// Mask PII in `text`
    pub async fn mask_text(&self, text: &str) -> Result<String> {
        Ok(self.process(text, "text").await?.text)
    }

    /// Mask PII in `text`, returning spans and statistics as well
    pub async fn analyze(&self, text: &str) -> Result<RedactionOutcome> {
        self.process(text, "text").await
    }

    /// Mask PII in a UTF-8 text file's bytes
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::Decode`] if `bytes` is not valid UTF-8.
    pub async fn redact_txt_bytes(&self, bytes: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| RedactError::Decode(format!("Input is not valid UTF-8: {e}")))?;
        Ok(self.process(text, "txt").await?.text)
    }

    /// Mask PII in a PDF and rebuild a plain-text PDF from the result
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::Extraction`] if the PDF cannot be parsed.
    /// Failures on individual embedded images are skipped.
    pub async fn redact_pdf_bytes(&self, bytes: &[u8]) -> Result<PdfRedaction> {
        let extractor = Arc::clone(&self.extractor);
        let data = bytes.to_vec();
        let document = tokio::task::spawn_blocking(move || extractor.extract(&data))
            .await
            .map_err(|e| RedactError::Other(format!("PDF extraction task failed: {e}")))??;

        let combined = document.combined_text();
        let outcome = self.process(&combined, "pdf").await?;
        let pdf = render_text_pdf(&outcome.text, &self.render)?;

        Ok(PdfRedaction {
            text: outcome.text,
            pdf,
            spans: outcome.spans,
            source_pages: document.pages.len(),
            ocr_fragments: document.ocr.len(),
            report: outcome.report,
        })
    }

    async fn process(&self, text: &str, kind: &str) -> Result<RedactionOutcome> {
        let started = Instant::now();
        let index = CharIndex::new(text);
        let mut report = RedactionReport::new(index.char_len(), self.predictor.name());

        let mut candidates = self.detector.detect_indexed(text, &index);
        report.pattern_candidates = candidates.len();

        let model = self
            .adapter
            .detect(self.predictor.as_ref(), text, &index)
            .await;
        report.model_candidates = model.spans.len();
        report.chunks_total = model.chunks_total;
        report.chunks_failed = model.chunks_failed;
        candidates.extend(model.spans);

        let mut spans = reconcile(candidates);
        spans.sort_by_key(|s| s.start);
        let redacted = self.redactor.apply_indexed(text, &index, &spans)?;

        report.record_spans(&spans);
        report.processing_time_ms = started.elapsed().as_millis() as u64;

        if report.is_degraded() {
            tracing::warn!(
                document_id = %report.document_id,
                chunks_failed = report.chunks_failed,
                chunks_total = report.chunks_total,
                "Model detection incomplete; pattern detection still applied"
            );
        }
        crate::log_document_redacted!(kind, spans.len(), started.elapsed());

        let outcome = RedactionOutcome {
            text: redacted,
            spans,
            report,
        };

        if let Some(ref audit) = self.audit {
            audit
                .log_redaction(kind, &outcome)
                .map_err(|e| RedactError::Audit(format!("{e:#}")))?;
        }

        Ok(outcome)
    }
}

/// Mask PII in `text` with default detection settings
///
/// Convenience for callers that only hold a predictor.
pub async fn mask_text(predictor: &dyn Predictor, text: &str) -> Result<String> {
    let detector = PatternDetector::new().map_err(|e| RedactError::Configuration(format!("{e:#}")))?;
    let index = CharIndex::new(text);

    let mut candidates: Vec<Span> = detector.detect_indexed(text, &index);
    candidates.extend(
        ModelAdapter::default()
            .detect(predictor, text, &index)
            .await
            .spans,
    );

    Redactor::default().apply_indexed(text, &index, &reconcile(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::make_test_pdf;
    use crate::domain::{PiiLabel, PredictorError};
    use crate::model::{DisabledPredictor, RawPrediction};
    use async_trait::async_trait;
    use tempfile::tempdir;

    /// Reports a person wherever a known name appears
    struct NamePredictor(&'static str);

    #[async_trait]
    impl Predictor for NamePredictor {
        async fn predict(&self, text: &str) -> std::result::Result<Vec<RawPrediction>, PredictorError> {
            let Some(byte_start) = text.find(self.0) else {
                return Ok(Vec::new());
            };
            let start = text[..byte_start].chars().count();
            let end = start + self.0.chars().count();
            Ok(vec![RawPrediction::new("B-PER", 0.98, start, end, self.0)])
        }

        fn name(&self) -> &str {
            "names"
        }
    }

    struct FailingPredictor;

    #[async_trait]
    impl Predictor for FailingPredictor {
        async fn predict(&self, _text: &str) -> std::result::Result<Vec<RawPrediction>, PredictorError> {
            Err(PredictorError::Backend("Cannot copy out of meta tensor".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    const EXAMPLE: &str = "Contact Jane Doe at jane.doe@example.com or 415-555-1234.";

    #[tokio::test]
    async fn test_mask_text_example() {
        let engine = RedactionEngine::new(Arc::new(NamePredictor("Jane Doe"))).unwrap();
        let redacted = engine.mask_text(EXAMPLE).await.unwrap();
        assert_eq!(redacted, "Contact [REDACTED] at [REDACTED] or [REDACTED].");
    }

    #[tokio::test]
    async fn test_free_mask_text_matches_engine() {
        let redacted = mask_text(&NamePredictor("Jane Doe"), EXAMPLE).await.unwrap();
        assert_eq!(redacted, "Contact [REDACTED] at [REDACTED] or [REDACTED].");
    }

    #[tokio::test]
    async fn test_analyze_reports_spans() {
        let engine = RedactionEngine::new(Arc::new(NamePredictor("Jane Doe"))).unwrap();
        let outcome = engine.analyze(EXAMPLE).await.unwrap();

        let labels: Vec<&PiiLabel> = outcome.spans.iter().map(|s| &s.label).collect();
        assert_eq!(
            labels,
            vec![&PiiLabel::GivenName, &PiiLabel::Email, &PiiLabel::TelephoneNum]
        );
        assert_eq!(outcome.report.pattern_candidates, 2);
        assert_eq!(outcome.report.model_candidates, 1);
        assert_eq!(outcome.report.chunks_total, 1);
        assert_eq!(outcome.report.spans_redacted, 3);
    }

    #[tokio::test]
    async fn test_predictor_failure_falls_back_to_patterns() {
        let engine = RedactionEngine::new(Arc::new(FailingPredictor)).unwrap();
        let outcome = engine.analyze(EXAMPLE).await.unwrap();

        assert_eq!(
            outcome.text,
            "Contact Jane Doe at [REDACTED] or [REDACTED]."
        );
        assert_eq!(outcome.report.chunks_failed, 1);
        assert!(outcome.report.is_degraded());
    }

    #[tokio::test]
    async fn test_txt_bytes_must_be_utf8() {
        let engine = RedactionEngine::new(Arc::new(DisabledPredictor)).unwrap();

        let ok = engine
            .redact_txt_bytes("SSN 123-45-6789".as_bytes())
            .await
            .unwrap();
        assert_eq!(ok, "SSN [REDACTED]");

        let err = engine.redact_txt_bytes(&[0x66, 0xff, 0xfe]).await.unwrap_err();
        assert!(matches!(err, RedactError::Decode(_)));
    }

    #[tokio::test]
    async fn test_pdf_redaction_rebuilds_document() {
        let mut config = RedactConfig::default();
        config.pdf.ocr_enabled = false;
        let engine = RedactionEngine::from_config(&config, Arc::new(DisabledPredictor)).unwrap();
        let pdf = make_test_pdf(&["Email jane.doe@example.com", "Nothing here"], false);

        let result = engine.redact_pdf_bytes(&pdf).await.unwrap();

        assert_eq!(result.source_pages, 2);
        assert!(result.text.contains("[REDACTED]"));
        assert!(!result.text.contains("jane.doe@example.com"));
        let rebuilt = lopdf::Document::load_mem(&result.pdf).unwrap();
        assert_eq!(rebuilt.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_extraction_error() {
        let engine = RedactionEngine::new(Arc::new(DisabledPredictor)).unwrap();
        let err = engine.redact_pdf_bytes(b"%PDF-garbage").await.unwrap_err();
        assert!(matches!(err, RedactError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_audit_log_written_per_document() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.jsonl");
        let mut config = RedactConfig::default();
        config.audit.enabled = true;
        config.audit.log_path = log_path.clone();
        let engine = RedactionEngine::from_config(&config, Arc::new(DisabledPredictor)).unwrap();

        engine.mask_text("mail a@example.com").await.unwrap();
        engine.mask_text("nothing").await.unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("a@example.com"));
    }
}
