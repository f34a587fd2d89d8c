//! Regex-based PII detector

use super::patterns::PatternRegistry;
use crate::domain::{CharIndex, DetectionSource, Span};
use anyhow::Result;
use std::sync::Arc;

/// Regex-based PII detector
///
/// Runs every compiled pattern over the full text once and reports each match
/// as a [`Span`] with char offsets. Matches from different families may
/// overlap; reconciliation happens downstream.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    pattern_registry: Arc<PatternRegistry>,
}

impl PatternDetector {
    /// Create a new detector with the built-in pattern library
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
        }
    }

    /// Underlying registry
    pub fn registry(&self) -> &PatternRegistry {
        &self.pattern_registry
    }

    /// Detect PII in `text`
    pub fn detect(&self, text: &str) -> Vec<Span> {
        let index = CharIndex::new(text);
        self.detect_indexed(text, &index)
    }

    /// Detect PII in `text` using a prebuilt char index
    pub fn detect_indexed(&self, text: &str, index: &CharIndex) -> Vec<Span> {
        let mut spans = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            for matched in pattern.regex.find_iter(text) {
                let (Some(start), Some(end)) = (
                    index.char_offset(matched.start()),
                    index.char_offset(matched.end()),
                ) else {
                    continue;
                };
                if start >= end {
                    continue;
                }

                spans.push(Span::new(
                    pattern.label.clone(),
                    start,
                    end,
                    pattern.confidence,
                    matched.as_str(),
                    DetectionSource::Pattern,
                ));
            }
        }

        tracing::debug!(spans = spans.len(), "Pattern detection complete");
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PiiLabel;

    fn labels_for<'a>(spans: &'a [Span], surface: &str) -> Vec<&'a PiiLabel> {
        spans
            .iter()
            .filter(|s| s.surface == surface)
            .map(|s| &s.label)
            .collect()
    }

    #[test]
    fn test_detect_email() {
        let detector = PatternDetector::new().unwrap();
        let spans = detector.detect("Contact: john.doe@example.com");

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label, PiiLabel::Email);
        assert_eq!((spans[0].start, spans[0].end), (9, 29));
        assert_eq!(spans[0].confidence, 1.0);
    }

    #[test]
    fn test_detect_phone() {
        let detector = PatternDetector::new().unwrap();
        let spans = detector.detect("Call 415-555-1234 today");

        assert_eq!(
            labels_for(&spans, "415-555-1234"),
            vec![&PiiLabel::TelephoneNum]
        );
    }

    #[test]
    fn test_detect_ssn_zip_and_dob() {
        let detector = PatternDetector::new().unwrap();
        let spans = detector.detect("SSN 123-45-6789, zip 94102, born 03/15/1985");

        assert!(labels_for(&spans, "123-45-6789").contains(&&PiiLabel::SocialNum));
        assert!(labels_for(&spans, "94102").contains(&&PiiLabel::ZipCode));
        assert!(labels_for(&spans, "03/15/1985").contains(&&PiiLabel::DateOfBirth));
    }

    #[test]
    fn test_detect_credit_card() {
        let detector = PatternDetector::new().unwrap();
        let spans = detector.detect("card 4532 1234 5678 9012 on file");

        assert!(labels_for(&spans, "4532 1234 5678 9012")
            .contains(&&PiiLabel::CreditCardNumber));
    }

    #[test]
    fn test_offsets_are_char_based() {
        let detector = PatternDetector::new().unwrap();
        let text = "Zoë: zoe@example.org";
        let spans = detector.detect(text);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (5, 20));
        assert_eq!(text.chars().count(), 20);
    }

    #[test]
    fn test_no_matches() {
        let detector = PatternDetector::new().unwrap();
        assert!(detector.detect("Nothing sensitive here.").is_empty());
        assert!(detector.detect("").is_empty());
    }
}
