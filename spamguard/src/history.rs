//! Prediction history
//!
//! Most-recent-first list of past predictions, persisted as a JSON array
//! under [`HISTORY_KEY`] after every mutation.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::{KeyValueStore, HISTORY_KEY};
use crate::types::HistoryItem;

/// Persisted prediction history
pub struct History {
    store: Arc<dyn KeyValueStore>,
    items: Vec<HistoryItem>,
}

impl History {
    /// Load history from the store.
    ///
    /// A missing key gives an empty list. So does an unparseable value; the
    /// parse failure is logged and the stored value left untouched until the
    /// next mutation overwrites it.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let items = match store.get(HISTORY_KEY)? {
            Some(saved) => match serde_json::from_str::<Vec<HistoryItem>>(&saved) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Failed to parse history, starting empty: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        debug!("Loaded {} history items", items.len());
        Ok(Self { store, items })
    }

    /// Most recent first
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Prepend an item and persist
    pub fn record(&mut self, item: HistoryItem) -> Result<()> {
        debug!(id = %item.id, label = %item.label, "Recording prediction in history");
        self.items.insert(0, item);
        self.persist()
    }

    /// Remove every item and persist the empty list
    pub fn clear(&mut self) -> Result<()> {
        let removed = self.items.len();
        self.items.clear();
        self.persist()?;
        info!("History cleared ({} items removed)", removed);
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.items)?;
        self.store.set(HISTORY_KEY, &serialized)
    }
}
