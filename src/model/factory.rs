//! Predictor construction and process-wide lifecycle

use super::{DisabledPredictor, HttpPredictor, Predictor};
use crate::config::{PredictorBackend, PredictorConfig};
use crate::domain::Result;
use std::sync::{Arc, OnceLock};

static SHARED_PREDICTOR: OnceLock<Arc<dyn Predictor>> = OnceLock::new();

/// Build the predictor selected by configuration
///
/// # Errors
///
/// Returns [`RedactError::PredictorInit`](crate::domain::RedactError::PredictorInit)
/// if the backend cannot be constructed. No masking can proceed without it.
pub fn build_predictor(config: &PredictorConfig) -> Result<Arc<dyn Predictor>> {
    let predictor: Arc<dyn Predictor> = match config.backend {
        PredictorBackend::Http => Arc::new(HttpPredictor::from_config(config)?),
        PredictorBackend::Disabled => {
            tracing::info!("Model predictor disabled, running pattern detection only");
            Arc::new(DisabledPredictor)
        }
    };
    Ok(predictor)
}

/// Process-wide predictor, built on first use and never replaced
///
/// Later calls return the instance built by the first successful call and
/// ignore `config`. A failed build leaves the slot empty.
pub fn shared_predictor(config: &PredictorConfig) -> Result<Arc<dyn Predictor>> {
    if let Some(predictor) = SHARED_PREDICTOR.get() {
        return Ok(Arc::clone(predictor));
    }

    let predictor = build_predictor(config)?;
    // A concurrent initializer may have won; keep whichever landed first
    let _ = SHARED_PREDICTOR.set(predictor);
    Ok(Arc::clone(SHARED_PREDICTOR.get().ok_or_else(|| {
        crate::domain::RedactError::PredictorInit("shared predictor unavailable".to_string())
    })?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RedactError;

    #[test]
    fn test_build_disabled_predictor() {
        let predictor = build_predictor(&PredictorConfig::default()).unwrap();
        assert_eq!(predictor.name(), "disabled");
    }

    #[test]
    fn test_build_http_without_endpoint_fails() {
        let config = PredictorConfig {
            backend: PredictorBackend::Http,
            ..Default::default()
        };
        assert!(matches!(
            build_predictor(&config),
            Err(RedactError::PredictorInit(_))
        ));
    }

    #[test]
    fn test_build_http_predictor() {
        let config = PredictorConfig {
            backend: PredictorBackend::Http,
            endpoint: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };
        let predictor = build_predictor(&config).unwrap();
        assert_eq!(predictor.name(), config.model);
    }

    #[test]
    fn test_shared_predictor_is_built_once() {
        let first = shared_predictor(&PredictorConfig::default()).unwrap();
        let second = shared_predictor(&PredictorConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
