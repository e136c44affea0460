//! Prediction gateway
//!
//! Tries the remote classifier once and falls back to the local keyword
//! classifier on any failure. Callers of [`PredictionGateway::predict`] only
//! ever see a result; [`PredictionGateway::predict_with_source`] also reports
//! which path produced it and why.

use tracing::{debug, info, warn};

use crate::classifier::{Classifier, KeywordClassifier, RemoteClassifier};
use crate::config::SpamGuardConfig;
use crate::error::{Result, SpamGuardError};
use crate::types::{FallbackReason, PredictionResult, PredictionSource};

/// Prediction gateway
pub struct PredictionGateway {
    remote: Option<Box<dyn Classifier>>,
    fallback: Box<dyn Classifier>,
}

impl PredictionGateway {
    /// Gateway with only a local classifier
    pub fn new(fallback: impl Classifier + 'static) -> Self {
        Self {
            remote: None,
            fallback: Box::new(fallback),
        }
    }

    pub fn with_remote(mut self, remote: impl Classifier + 'static) -> Self {
        self.remote = Some(Box::new(remote));
        self
    }

    pub fn from_config(config: &SpamGuardConfig) -> Result<Self> {
        let gateway = Self::new(KeywordClassifier::from_config(&config.fallback));

        match RemoteClassifier::from_config(&config.remote)? {
            Some(remote) => {
                info!("Remote prediction endpoint: {}", remote.base_url());
                Ok(gateway.with_remote(remote))
            }
            None => {
                info!("No remote endpoint configured, using local classifier");
                Ok(gateway)
            }
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Predict, hiding which path produced the result
    pub async fn predict(&self, text: &str, force_mock: bool) -> Result<PredictionResult> {
        let (result, _) = self.predict_with_source(text, force_mock).await?;
        Ok(result)
    }

    /// Predict and report the path taken
    pub async fn predict_with_source(
        &self,
        text: &str,
        force_mock: bool,
    ) -> Result<(PredictionResult, PredictionSource)> {
        let remote = match (&self.remote, force_mock) {
            (_, true) => return self.fall_back(text, FallbackReason::Forced).await,
            (None, false) => return self.fall_back(text, FallbackReason::Unconfigured).await,
            (Some(remote), false) => remote,
        };

        match remote.classify(text).await {
            Ok(result) => {
                debug!(id = %result.id, label = %result.label, "Prediction served by {}", remote.name());
                Ok((result, PredictionSource::Remote))
            }
            Err(e) => {
                let reason = fallback_reason(&e);
                warn!(
                    reason = reason.as_str(),
                    error = %e,
                    "Remote prediction unavailable, falling back to local classifier"
                );
                self.fall_back(text, reason).await
            }
        }
    }

    async fn fall_back(
        &self,
        text: &str,
        reason: FallbackReason,
    ) -> Result<(PredictionResult, PredictionSource)> {
        debug!(reason = reason.as_str(), "Using {}", self.fallback.name());
        let result = self.fallback.classify(text).await?;
        Ok((result, PredictionSource::Fallback(reason)))
    }
}

/// Map a remote failure to the reason recorded for the fallback
fn fallback_reason(err: &SpamGuardError) -> FallbackReason {
    match err {
        SpamGuardError::RemoteStatus(code) => FallbackReason::Status(*code),
        SpamGuardError::MalformedResponse(_) | SpamGuardError::Json(_) => FallbackReason::Malformed,
        SpamGuardError::Http(e) if e.is_decode() => FallbackReason::Malformed,
        _ => FallbackReason::Transport,
    }
}
