//! spamguard: SMS spam/ham classification client
//!
//! Submits a message to a remote prediction endpoint and falls back to a
//! local keyword heuristic whenever the endpoint is unreachable, returns an
//! error status, or answers with something that is not a prediction.
//!
//! # Features
//!
//! - Remote `POST /api/predict` client with health check
//! - Seedable keyword fallback classifier with per-token explanations
//! - Persisted, most-recent-first prediction history
//! - Light/dark theme preference
//! - Terminal rendering of predictions, token highlights and top contributors
//!
//! # Example Configuration
//!
//! ```toml
//! [remote]
//! base_url = "http://localhost:5000"
//! timeout_secs = 5
//!
//! [fallback]
//! latency_ms = 1200
//! keywords = ["win", "winner", "free", "prize", "urgent", "cash", "claim", "guaranteed", "offer"]
//! keyword_weight = 0.2
//!
//! [storage]
//! path = "spamguard-state.json"
//!
//! [ui]
//! default_theme = "light"
//! color = true
//! ```
//!
//! # Example
//!
//! ```no_run
//! use spamguard::classifier::KeywordClassifier;
//! use spamguard::PredictionGateway;
//!
//! #[tokio::main]
//! async fn main() -> spamguard::Result<()> {
//!     let gateway = PredictionGateway::new(KeywordClassifier::with_seed(7));
//!     let result = gateway.predict("WINNER! Claim your FREE prize", false).await?;
//!     println!("{} ({:.2})", result.label, result.probability);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod history;
pub mod render;
pub mod store;
pub mod theme;
pub mod types;

pub use app::App;
pub use crate::config::SpamGuardConfig;
pub use error::{Result, SpamGuardError};
pub use gateway::PredictionGateway;
pub use types::{HistoryItem, Label, PredictionResult, PredictionSource, ThemeMode, TokenExplanation};
