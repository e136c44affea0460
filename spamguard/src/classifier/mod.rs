//! Classifier abstraction
//!
//! Two engines implement [`Classifier`]: the HTTP client for a remote
//! prediction endpoint and the local keyword heuristic used as fallback.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PredictionResult;

pub mod keyword;
pub mod remote;

pub use keyword::{KeywordClassifier, TokenScorer, TokenScores};
pub use remote::{HealthReport, RemoteClassifier};

/// Classifier trait
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a message.
    ///
    /// The returned result always carries a fresh id, the current time and
    /// `text` as its original text.
    async fn classify(&self, text: &str) -> Result<PredictionResult>;

    /// Engine name for logs
    fn name(&self) -> &str;
}
