//! Predictor that recognizes nothing

use super::{Predictor, RawPrediction};
use crate::domain::PredictorError;
use async_trait::async_trait;

/// Pattern-only operation: the model stage contributes no spans
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPredictor;

#[async_trait]
impl Predictor for DisabledPredictor {
    async fn predict(&self, _text: &str) -> Result<Vec<RawPrediction>, PredictorError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_predicts_nothing() {
        let predictions = DisabledPredictor.predict("Jane Doe").await.unwrap();
        assert!(predictions.is_empty());
    }
}
