//! Application state
//!
//! Ties the gateway, history and theme together and tracks the prediction
//! currently on display.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SpamGuardConfig;
use crate::error::{Result, SpamGuardError};
use crate::gateway::PredictionGateway;
use crate::history::History;
use crate::store::{FileStore, KeyValueStore};
use crate::theme::ThemePreference;
use crate::types::{HistoryItem, PredictionResult, PredictionSource, ThemeMode};

/// Message shown to the user when a prediction fails unexpectedly
pub const GENERIC_FAILURE: &str = "Failed to predict. Please try again.";

/// Application state
pub struct App {
    gateway: PredictionGateway,
    history: History,
    theme: ThemePreference,
    current: Option<PredictionResult>,
}

impl App {
    pub fn new(
        gateway: PredictionGateway,
        store: Arc<dyn KeyValueStore>,
        default_theme: ThemeMode,
    ) -> Result<Self> {
        let history = History::load(store.clone())?;
        let theme = ThemePreference::load(store, default_theme)?;

        Ok(Self {
            gateway,
            history,
            theme,
            current: None,
        })
    }

    /// Build from configuration, persisting to the configured state file
    pub fn from_config(config: &SpamGuardConfig) -> Result<Self> {
        let gateway = PredictionGateway::from_config(config)?;
        let store = Arc::new(FileStore::new(&config.storage.path));
        debug!("State file: {}", store.path().display());
        Self::new(gateway, store, config.ui.default_theme)
    }

    /// Classify a message and display it without saving
    pub async fn predict(&mut self, text: &str, force_mock: bool) -> Result<PredictionSource> {
        if text.trim().is_empty() {
            return Err(SpamGuardError::EmptyMessage);
        }

        self.current = None;
        let (result, source) = self.gateway.predict_with_source(text, force_mock).await?;
        info!(id = %result.id, label = %result.label, probability = result.probability, "Prediction complete");
        self.current = Some(result);
        Ok(source)
    }

    /// Classify a message, display it and save it to history
    pub async fn submit(&mut self, text: &str, force_mock: bool) -> Result<PredictionResult> {
        self.predict(text, force_mock).await?;
        self.save_current()?;
        self.current
            .clone()
            .ok_or_else(|| SpamGuardError::NotFound("current prediction".to_string()))
    }

    /// Prepend the displayed prediction to history
    pub fn save_current(&mut self) -> Result<()> {
        let current = self
            .current
            .clone()
            .ok_or_else(|| SpamGuardError::NotFound("current prediction".to_string()))?;
        self.history.record(current)
    }

    pub fn current(&self) -> Option<&PredictionResult> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[HistoryItem] {
        self.history.items()
    }

    /// Promote a stored prediction to the current display
    pub fn select_history(&mut self, id: &str) -> Result<&PredictionResult> {
        let item = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| SpamGuardError::NotFound(format!("history item {}", id)))?;
        Ok(self.current.insert(item))
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme.mode()
    }

    pub fn set_theme(&mut self, mode: ThemeMode) -> Result<()> {
        self.theme.set(mode)
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        self.theme.toggle()
    }

    pub fn gateway(&self) -> &PredictionGateway {
        &self.gateway
    }
}

/// Read a whole text file as the message to classify
pub fn load_message_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
