//! Chunked invocation of a [`Predictor`] over a whole document

use super::{normalize_label, Predictor, RawPrediction};
use crate::domain::{CharIndex, DetectionSource, RedactError, Result, Span};

/// Default window length in chars
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive windows in chars
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Spans produced by one adapter pass plus chunk bookkeeping
#[derive(Debug, Clone, Default)]
pub struct AdapterOutcome {
    /// Entity spans in document offsets, `O` labels already removed
    pub spans: Vec<Span>,
    /// Number of predictor invocations
    pub chunks_total: usize,
    /// Invocations that failed and contributed nothing
    pub chunks_failed: usize,
}

/// Runs a predictor over a document in overlapping windows
#[derive(Debug, Clone, Copy)]
pub struct ModelAdapter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ModelAdapter {
    /// Create an adapter with explicit window settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RedactError::Configuration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(RedactError::Configuration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Window length in chars
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in chars
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Char windows `[start, end)` covering a text of `char_len` chars
    ///
    /// Texts no longer than the chunk size are a single window. Longer texts
    /// get windows starting every `chunk_size - chunk_overlap` chars; the last
    /// window may be short.
    pub fn windows(&self, char_len: usize) -> Vec<(usize, usize)> {
        if char_len <= self.chunk_size {
            return vec![(0, char_len)];
        }

        let step = self.chunk_size - self.chunk_overlap;
        (0..char_len)
            .step_by(step)
            .map(|start| (start, (start + self.chunk_size).min(char_len)))
            .collect()
    }

    /// Run `predictor` over `text` and collect document-offset spans
    ///
    /// Chunks are processed sequentially. A failing chunk is logged and
    /// skipped; it never fails the whole pass.
    pub async fn detect(
        &self,
        predictor: &dyn Predictor,
        text: &str,
        index: &CharIndex,
    ) -> AdapterOutcome {
        let mut outcome = AdapterOutcome::default();
        if text.is_empty() {
            return outcome;
        }

        for (chunk_idx, (start, end)) in self.windows(index.char_len()).into_iter().enumerate() {
            let Some(chunk) = index.slice(text, start, end) else {
                continue;
            };
            outcome.chunks_total += 1;

            let predictions = match predictor.predict(chunk).await {
                Ok(predictions) => predictions,
                Err(e) => {
                    outcome.chunks_failed += 1;
                    tracing::warn!(
                        predictor = predictor.name(),
                        chunk = chunk_idx,
                        offset = start,
                        error = %e,
                        "Predictor failed on chunk, skipping"
                    );
                    continue;
                }
            };

            tracing::debug!(
                chunk = chunk_idx,
                offset = start,
                predictions = predictions.len(),
                "Chunk predicted"
            );

            let chunk_len = end - start;
            outcome.spans.extend(
                predictions
                    .iter()
                    .filter_map(|p| Self::to_span(p, start, chunk_len, text, index)),
            );
        }

        outcome
    }

    /// Validate one record and reproject it into document offsets
    fn to_span(
        prediction: &RawPrediction,
        offset: usize,
        chunk_len: usize,
        text: &str,
        index: &CharIndex,
    ) -> Option<Span> {
        let label = normalize_label(prediction.label());
        if !label.is_entity() {
            return None;
        }

        let (start, end) = (prediction.start(), prediction.end());
        if start >= end || end > chunk_len {
            tracing::debug!(
                label = %label,
                start,
                end,
                chunk_len,
                "Dropping prediction with invalid offsets"
            );
            return None;
        }

        let (abs_start, abs_end) = (start + offset, end + offset);
        let surface = index.slice(text, abs_start, abs_end).unwrap_or_default();

        Some(Span::new(
            label,
            abs_start,
            abs_end,
            prediction.score(),
            surface,
            DetectionSource::Model,
        ))
    }
}

impl Default for ModelAdapter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}
