//! Remote prediction endpoint client
//!
//! Talks to a backend exposing `POST /api/predict` and `GET /api/health`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::Classifier;
use crate::config::RemoteConfig;
use crate::error::{Result, SpamGuardError};
use crate::types::{Label, PredictionResult, TokenExplanation};

/// Remote classifier
pub struct RemoteClassifier {
    base_url: String,
    client: reqwest::Client,
}

/// Predict request body
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

/// Fields taken from the remote body. Anything else it sends is ignored,
/// including its own id, timestamp and original text.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    label: Label,
    probability: f64,
    explanation: Vec<TokenExplanation>,
}

/// Backend health report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

impl RemoteClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with a request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Build from config; `None` when no base URL is configured
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>> {
        let Some(ref base_url) = config.base_url else {
            return Ok(None);
        };

        let classifier = match config.timeout() {
            Some(timeout) => Self::with_timeout(base_url.clone(), timeout)?,
            None => Self::new(base_url.clone()),
        };
        Ok(Some(classifier))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Query the backend health endpoint
    pub async fn health(&self) -> Result<HealthReport> {
        let url = self.endpoint("/api/health");
        debug!("Remote health check: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SpamGuardError::RemoteStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SpamGuardError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<PredictionResult> {
        let url = self.endpoint("/api/predict");
        debug!("Remote predict: POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_text, "Remote predict failed");
            return Err(SpamGuardError::RemoteStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: PredictResponse = serde_json::from_str(&body)
            .map_err(|e| SpamGuardError::MalformedResponse(e.to_string()))?;

        debug!(
            label = %parsed.label,
            probability = parsed.probability,
            tokens = parsed.explanation.len(),
            "Remote prediction received"
        );

        Ok(PredictionResult::new(
            parsed.label,
            parsed.probability,
            parsed.explanation,
            text,
        ))
    }

    fn name(&self) -> &str {
        "remote"
    }
}
