//! Model-based PII detection
//!
//! A token-classification model is consumed through the [`Predictor`] trait.
//! [`adapter::ModelAdapter`] chunks long documents, isolates per-chunk
//! failures, normalizes native labels into the [`PiiLabel`](crate::domain::PiiLabel)
//! taxonomy and reprojects chunk-relative offsets to document offsets.
//!
//! # Backends
//!
//! - [`http::HttpPredictor`] - hosted token-classification inference endpoint
//! - [`disabled::DisabledPredictor`] - no model, pattern-only operation

pub mod adapter;
pub mod disabled;
pub mod factory;
pub mod http;
pub mod labels;

use crate::domain::PredictorError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub use adapter::{AdapterOutcome, ModelAdapter};
pub use disabled::DisabledPredictor;
pub use factory::{build_predictor, shared_predictor};
pub use http::HttpPredictor;
pub use labels::normalize_label;

/// Token-classification predictor
///
/// Offsets in the returned records are char offsets relative to the `text`
/// passed in. Implementations must tolerate many calls per document; the
/// pipeline never calls one instance concurrently.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Recognize entities in `text`
    async fn predict(&self, text: &str) -> Result<Vec<RawPrediction>, PredictorError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Prediction record as emitted by a predictor
///
/// Every field is optional on the wire and a field of the wrong type reads
/// as absent; defaults are applied once here (label `O`, score 1.0, offsets
/// 0) so the rest of the pipeline only sees fixed-shape
/// [`Span`](crate::domain::Span)s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Aggregated entity label
    #[serde(default, deserialize_with = "lenient")]
    pub entity_group: Option<String>,
    /// Token-level entity label
    #[serde(default, deserialize_with = "lenient")]
    pub entity: Option<String>,
    /// Model score
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    /// Start char offset
    #[serde(default, deserialize_with = "lenient")]
    pub start: Option<i64>,
    /// End char offset
    #[serde(default, deserialize_with = "lenient")]
    pub end: Option<i64>,
    /// Covered text
    #[serde(default, deserialize_with = "lenient")]
    pub word: Option<String>,
}

/// Deserialize an optional field, treating a mistyped value as missing
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl RawPrediction {
    /// Build a record with every field present
    pub fn new(label: &str, score: f64, start: usize, end: usize, word: &str) -> Self {
        Self {
            entity_group: Some(label.to_string()),
            entity: None,
            score: Some(score),
            start: Some(start as i64),
            end: Some(end as i64),
            word: Some(word.to_string()),
        }
    }

    /// Native label, `O` when absent
    pub fn label(&self) -> &str {
        self.entity_group
            .as_deref()
            .or(self.entity.as_deref())
            .unwrap_or("O")
    }

    /// Score clamped to [0, 1], 1.0 when absent
    pub fn score(&self) -> f32 {
        self.score.unwrap_or(1.0).clamp(0.0, 1.0) as f32
    }

    /// Start offset, 0 when absent or negative
    pub fn start(&self) -> usize {
        self.start.unwrap_or(0).max(0) as usize
    }

    /// End offset, 0 when absent or negative
    pub fn end(&self) -> usize {
        self.end.unwrap_or(0).max(0) as usize
    }
}
