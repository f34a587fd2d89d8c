//! Hosted token-classification predictor
//!
//! Talks to an inference endpoint that accepts `{"inputs": "<text>"}` and
//! answers with a JSON list of `{entity_group, score, start, end, word}`
//! records (the Hugging Face Inference API / text-embeddings-inference shape
//! for token classification with simple aggregation).

use super::{Predictor, RawPrediction};
use crate::config::{PredictorConfig, SecretString};
use crate::domain::{PredictorError, RedactError, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// HTTP inference endpoint predictor
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: Url,
    api_token: Option<SecretString>,
    model: String,
}

impl HttpPredictor {
    /// Create a predictor from configuration
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::PredictorInit`] if the endpoint is missing or
    /// invalid, or the HTTP client cannot be built.
    pub fn from_config(config: &PredictorConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            RedactError::PredictorInit(
                "predictor.endpoint is required for the http backend".to_string(),
            )
        })?;

        Self::new(
            endpoint,
            config.api_token.clone(),
            Duration::from_secs(config.timeout_seconds),
            &config.model,
        )
    }

    /// Create a predictor from explicit parts
    pub fn new(
        endpoint: &str,
        api_token: Option<SecretString>,
        timeout: Duration,
        model: &str,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            RedactError::PredictorInit(format!("Invalid predictor endpoint '{endpoint}': {e}"))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RedactError::PredictorInit(format!(
                "Predictor endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RedactError::PredictorInit(format!("Failed to build HTTP client: {e}")))?;

        tracing::info!(endpoint = %endpoint, model = model, "HTTP predictor initialized");

        Ok(Self {
            client,
            endpoint,
            api_token,
            model: model.to_string(),
        })
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Flatten a response body into prediction records
    fn parse_predictions(body: Value) -> std::result::Result<Vec<RawPrediction>, PredictorError> {
        match body {
            Value::Array(items) => {
                let mut predictions = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        // Batched responses nest one list per input
                        Value::Array(inner) => {
                            predictions.extend(inner.into_iter().filter_map(Self::parse_record));
                        }
                        record => predictions.extend(Self::parse_record(record)),
                    }
                }
                Ok(predictions)
            }
            Value::Object(map) if map.contains_key("error") => Err(PredictorError::Backend(
                map.get("error")
                    .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                    .unwrap_or_default(),
            )),
            other => Err(PredictorError::InvalidResponse(format!(
                "expected a JSON list, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read one record, dropping anything that is not a prediction object
    fn parse_record(record: Value) -> Option<RawPrediction> {
        if !record.is_object() {
            tracing::debug!(kind = json_kind(&record), "Dropping non-object prediction record");
            return None;
        }
        match serde_json::from_value(record) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping unreadable prediction record");
                None
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, text: &str) -> std::result::Result<Vec<RawPrediction>, PredictorError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&InferenceRequest { inputs: text });
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PredictorError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PredictorError::Status {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PredictorError::InvalidResponse(e.to_string()))?;

        Self::parse_predictions(body)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use mockito::Matcher;
    use serde_json::json;

    fn predictor(url: &str, token: Option<&str>) -> HttpPredictor {
        HttpPredictor::new(
            url,
            token.map(|t| secret_string(t.to_string())),
            Duration::from_secs(5),
            "dslim/bert-base-NER",
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_endpoint_is_init_error() {
        let result = HttpPredictor::new("not a url", None, Duration::from_secs(1), "m");
        assert!(matches!(result, Err(RedactError::PredictorInit(_))));

        let result = HttpPredictor::new("ftp://host/model", None, Duration::from_secs(1), "m");
        assert!(matches!(result, Err(RedactError::PredictorInit(_))));
    }

    #[test]
    fn test_missing_endpoint_is_init_error() {
        let config = PredictorConfig::default();
        assert!(matches!(
            HttpPredictor::from_config(&config),
            Err(RedactError::PredictorInit(_))
        ));
    }

    #[test]
    fn test_parse_nested_batch_response() {
        let body = json!([[{"entity_group": "PER", "score": 0.99, "start": 0, "end": 4, "word": "Jane"}]]);
        let predictions = HttpPredictor::parse_predictions(body).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].label(), "PER");
    }

    #[test]
    fn test_malformed_record_keeps_the_rest() {
        let body = json!([
            {"entity_group": "PER", "score": 0.97, "start": 0, "end": 4, "word": "Jane"},
            {"entity_group": "LOC", "score": "high", "start": 10, "end": 16, "word": "Boston"},
            "garbage",
            null
        ]);

        let predictions = HttpPredictor::parse_predictions(body).unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label(), "PER");
        assert_eq!((predictions[0].start(), predictions[0].end()), (0, 4));
        assert_eq!(predictions[1].label(), "LOC");
        assert_eq!(predictions[1].score(), 1.0);
        assert_eq!((predictions[1].start(), predictions[1].end()), (10, 16));
    }

    #[test]
    fn test_parse_error_object() {
        let body = json!({"error": "Model is currently loading"});
        let err = HttpPredictor::parse_predictions(body).unwrap_err();
        assert!(matches!(err, PredictorError::Backend(ref m) if m.contains("loading")));
    }

    #[tokio::test]
    async fn test_predict_sends_inputs_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/ner")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::Json(json!({"inputs": "Jane Doe lives here"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"entity_group": "PER", "score": 0.998, "word": "Jane Doe", "start": 0, "end": 8}]"#,
            )
            .create_async()
            .await;

        let predictor = predictor(&format!("{}/models/ner", server.url()), Some("hf_test"));
        let predictions = predictor.predict("Jane Doe lives here").await.unwrap();

        mock.assert_async().await;
        assert_eq!(predictions.len(), 1);
        assert_eq!((predictions[0].start(), predictions[0].end()), (0, 8));
    }

    #[tokio::test]
    async fn test_predict_maps_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let predictor = predictor(&format!("{}/", server.url()), None);
        let err = predictor.predict("text").await.unwrap_err();

        assert!(matches!(err, PredictorError::Status { status: 503, .. }));
    }
}
