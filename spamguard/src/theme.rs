//! Theme preference persistence

use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::store::{KeyValueStore, THEME_KEY};
use crate::types::ThemeMode;

/// Persisted light/dark preference
pub struct ThemePreference {
    store: Arc<dyn KeyValueStore>,
    mode: ThemeMode,
}

impl ThemePreference {
    /// Load the stored mode; anything other than `light`/`dark` yields `default`
    pub fn load(store: Arc<dyn KeyValueStore>, default: ThemeMode) -> Result<Self> {
        let mode = store
            .get(THEME_KEY)?
            .and_then(|saved| saved.parse::<ThemeMode>().ok())
            .unwrap_or(default);

        debug!("Theme: {}", mode);
        Ok(Self { store, mode })
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn set(&mut self, mode: ThemeMode) -> Result<()> {
        self.mode = mode;
        self.store.set(THEME_KEY, mode.as_str())
    }

    /// Flip between light and dark, returning the new mode
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        let next = self.mode.toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_default_when_unset() {
        let theme = ThemePreference::load(Arc::new(MemoryStore::new()), ThemeMode::Dark).unwrap();
        assert_eq!(theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_invalid_value_uses_default() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "solarized").unwrap();

        let theme = ThemePreference::load(store, ThemeMode::Light).unwrap();
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut theme = ThemePreference::load(store.clone(), ThemeMode::Light).unwrap();

        assert_eq!(theme.toggle().unwrap(), ThemeMode::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reloaded = ThemePreference::load(store, ThemeMode::Light).unwrap();
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
    }
}
