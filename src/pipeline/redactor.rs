//! Placeholder substitution

use crate::domain::{CharIndex, RedactError, Result, Span};

/// Literal substituted for every redacted span
pub const DEFAULT_PLACEHOLDER: &str = "[REDACTED]";

/// Replaces span ranges with a fixed placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
    placeholder: String,
}

impl Redactor {
    /// Create a redactor with a custom placeholder
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Placeholder literal
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Apply a reconciled span set to `text`
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::Redaction`] for out-of-bounds or overlapping
    /// spans.
    pub fn apply(&self, text: &str, spans: &[Span]) -> Result<String> {
        self.apply_indexed(text, &CharIndex::new(text), spans)
    }

    /// [`Redactor::apply`] with a prebuilt index for `text`
    ///
    /// Spans are processed in descending start order so each replacement
    /// leaves the offsets of the spans still pending untouched. Each span
    /// collapses to one placeholder; duplicate spans collapse together.
    /// Non-entity spans are ignored.
    pub fn apply_indexed(&self, text: &str, index: &CharIndex, spans: &[Span]) -> Result<String> {
        let mut ordered: Vec<&Span> = spans.iter().filter(|s| s.is_entity()).collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        let char_len = index.char_len();
        let mut out = text.to_string();
        let mut previous: Option<(usize, usize)> = None;

        for span in ordered {
            if !span.is_valid_for(char_len) {
                return Err(RedactError::Redaction(format!(
                    "{} span {}..{} is out of bounds for text of {} chars",
                    span.label, span.start, span.end, char_len
                )));
            }

            if let Some((prev_start, prev_end)) = previous {
                if (span.start, span.end) == (prev_start, prev_end) {
                    continue;
                }
                if span.end > prev_start {
                    return Err(RedactError::Redaction(format!(
                        "{} span {}..{} overlaps span {}..{}",
                        span.label, span.start, span.end, prev_start, prev_end
                    )));
                }
            }

            let (byte_start, byte_end) = index
                .byte_offset(span.start)
                .zip(index.byte_offset(span.end))
                .ok_or_else(|| {
                    RedactError::Redaction(format!(
                        "span {}..{} does not map to byte offsets",
                        span.start, span.end
                    ))
                })?;
            out.replace_range(byte_start..byte_end, &self.placeholder);
            previous = Some((span.start, span.end));
        }

        Ok(out)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}
