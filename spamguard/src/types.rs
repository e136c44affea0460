//! Prediction types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpamGuardError;

/// Classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Unwanted message
    Spam,
    /// Legitimate message
    Ham,
}

impl Label {
    /// Label for a spam probability (strictly above one half is spam)
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.5 {
            Self::Spam
        } else {
            Self::Ham
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Ham => "ham",
        }
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, Self::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-token contribution to a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenExplanation {
    /// Token as it appeared in the message (whitespace split)
    pub token: String,
    /// Claimed contribution; remote backends may send negative values
    pub score: f64,
}

/// A single classification outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Unique ID for history
    pub id: String,
    pub label: Label,
    /// Spam probability, 0.0 to 1.0
    pub probability: f64,
    pub explanation: Vec<TokenExplanation>,
    pub timestamp: DateTime<Utc>,
    pub original_text: String,
}

impl PredictionResult {
    /// Build a result with a fresh id and the current time
    pub fn new(
        label: Label,
        probability: f64,
        explanation: Vec<TokenExplanation>,
        original_text: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label,
            probability,
            explanation,
            timestamp: Utc::now(),
            original_text: original_text.into(),
        }
    }

    /// Confidence as a whole percentage
    pub fn confidence_percent(&self) -> u8 {
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Stored history entries share the prediction shape
pub type HistoryItem = PredictionResult;

/// Display theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite mode
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = SpamGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(SpamGuardError::Config(format!(
                "Unknown theme '{}', expected 'light' or 'dark'",
                other
            ))),
        }
    }
}

/// Where a prediction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    /// Remote endpoint answered with a well-formed prediction
    Remote,
    /// Local keyword classifier produced the result
    Fallback(FallbackReason),
}

/// Why the gateway used the local classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Caller asked for mock mode
    Forced,
    /// No remote endpoint configured
    Unconfigured,
    /// Connection, timeout or body read failure
    Transport,
    /// Non-success HTTP status
    Status(u16),
    /// Body was not a prediction
    Malformed,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forced => "forced",
            Self::Unconfigured => "unconfigured",
            Self::Transport => "transport",
            Self::Status(_) => "status",
            Self::Malformed => "malformed",
        }
    }
}
