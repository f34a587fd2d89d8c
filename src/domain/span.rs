//! Span and label types
//!
//! A [`Span`] is the single unit that flows through detection, reconciliation
//! and redaction. Offsets are half-open char offsets into the original,
//! unmodified document text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// PII taxonomy shared by pattern and model detections
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PiiLabel {
    /// Person name
    GivenName,
    /// Email address
    Email,
    /// Telephone number
    TelephoneNum,
    /// Social security style 9-digit number
    SocialNum,
    /// 16-digit card number
    CreditCardNumber,
    /// 5 or 9 digit postal code
    ZipCode,
    /// Numeric date of birth
    DateOfBirth,
    /// City or other location
    City,
    /// Organization / misc entity, treated as a username-class identifier
    Username,
    /// Model label with no dedicated taxonomy entry
    Other(String),
    /// Non-entity
    None,
}

impl PiiLabel {
    /// Canonical tag for the label
    pub fn tag(&self) -> &str {
        match self {
            Self::GivenName => "GIVENNAME",
            Self::Email => "EMAIL",
            Self::TelephoneNum => "TELEPHONENUM",
            Self::SocialNum => "SOCIALNUM",
            Self::CreditCardNumber => "CREDITCARDNUMBER",
            Self::ZipCode => "ZIPCODE",
            Self::DateOfBirth => "DATEOFBIRTH",
            Self::City => "CITY",
            Self::Username => "USERNAME",
            Self::Other(tag) => tag.as_str(),
            Self::None => "O",
        }
    }

    /// Parse a canonical tag. Unknown tags become [`PiiLabel::Other`].
    pub fn from_tag(tag: &str) -> Self {
        let upper = tag.trim().to_uppercase();
        match upper.as_str() {
            "" | "O" => Self::None,
            "GIVENNAME" => Self::GivenName,
            "EMAIL" => Self::Email,
            "TELEPHONENUM" => Self::TelephoneNum,
            "SOCIALNUM" => Self::SocialNum,
            "CREDITCARDNUMBER" => Self::CreditCardNumber,
            "ZIPCODE" => Self::ZipCode,
            "DATEOFBIRTH" => Self::DateOfBirth,
            "CITY" => Self::City,
            "USERNAME" => Self::Username,
            _ => Self::Other(upper),
        }
    }

    /// Whether this label denotes an entity that must be redacted
    pub fn is_entity(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for PiiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<PiiLabel> for String {
    fn from(label: PiiLabel) -> Self {
        label.tag().to_string()
    }
}

impl From<String> for PiiLabel {
    fn from(tag: String) -> Self {
        PiiLabel::from_tag(&tag)
    }
}

/// Which detector produced a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Regex pattern library
    Pattern,
    /// Token-classification model
    Model,
}

/// Detected PII occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Taxonomy label
    pub label: PiiLabel,
    /// Start char offset (inclusive)
    pub start: usize,
    /// End char offset (exclusive)
    pub end: usize,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Covered text. Diagnostic only; offsets are authoritative.
    pub surface: String,
    /// Producing detector
    pub source: DetectionSource,
}

impl Span {
    /// Create a new span
    pub fn new(
        label: PiiLabel,
        start: usize,
        end: usize,
        confidence: f32,
        surface: impl Into<String>,
        source: DetectionSource,
    ) -> Self {
        Self {
            label,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
            surface: surface.into(),
            source,
        }
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the two half-open ranges intersect
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// `0 <= start < end <= text_len`
    pub fn is_valid_for(&self, text_len: usize) -> bool {
        self.start < self.end && self.end <= text_len
    }

    /// Whether the span carries a redactable label
    pub fn is_entity(&self) -> bool {
        self.label.is_entity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn span(start: usize, end: usize) -> Span {
        Span::new(PiiLabel::Email, start, end, 1.0, "", DetectionSource::Pattern)
    }

    #[test_case("GIVENNAME", PiiLabel::GivenName)]
    #[test_case("email", PiiLabel::Email)]
    #[test_case("O", PiiLabel::None)]
    #[test_case("", PiiLabel::None)]
    #[test_case("passport", PiiLabel::Other("PASSPORT".to_string()))]
    fn test_label_from_tag(tag: &str, expected: PiiLabel) {
        assert_eq!(PiiLabel::from_tag(tag), expected);
    }

    #[test]
    fn test_label_serde_uses_tag() {
        let json = serde_json::to_string(&PiiLabel::CreditCardNumber).unwrap();
        assert_eq!(json, "\"CREDITCARDNUMBER\"");

        let parsed: PiiLabel = serde_json::from_str("\"CITY\"").unwrap();
        assert_eq!(parsed, PiiLabel::City);
    }

    #[test]
    fn test_overlaps_is_half_open() {
        assert!(span(0, 5).overlaps(&span(4, 8)));
        assert!(!span(0, 5).overlaps(&span(5, 8)));
        assert!(span(2, 3).overlaps(&span(0, 10)));
    }

    #[test]
    fn test_is_valid_for() {
        assert!(span(0, 3).is_valid_for(3));
        assert!(!span(0, 4).is_valid_for(3));
        assert!(!span(2, 2).is_valid_for(3));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let s = Span::new(PiiLabel::City, 0, 1, 1.7, "x", DetectionSource::Model);
        assert_eq!(s.confidence, 1.0);
    }
}
