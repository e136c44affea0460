//! Configuration for spamguard
//!
//! Settings are layered with the [`config`] crate: built-in defaults, then an
//! optional TOML file, then `SPAMGUARD_*` environment variables using `__` as
//! the section separator (`SPAMGUARD_REMOTE__BASE_URL`,
//! `SPAMGUARD_FALLBACK__LATENCY_MS`, ...). `SPAMGUARD_API_URL` is accepted as
//! a shortcut for the remote base URL and wins over every other layer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SpamGuardError};
use crate::types::ThemeMode;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "spamguard.toml";

/// Main spamguard configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpamGuardConfig {
    /// Remote prediction endpoint
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Local keyword classifier
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Persisted state
    #[serde(default)]
    pub storage: StorageConfig,
    /// Terminal presentation
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Base URL, `/api/predict` is appended. Unset means local only.
    pub base_url: Option<String>,
    /// Request timeout in seconds; the transport default applies when unset
    pub timeout_secs: Option<u64>,
}

/// Fallback classifier configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackConfig {
    /// Simulated latency before a fallback result is returned
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Spam keywords, matched against cleaned lower-case tokens
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Probability added per keyword occurrence
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,
    /// Fixed PRNG seed for reproducible scores
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// JSON file holding theme and history
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

/// Presentation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Theme used when nothing valid is stored
    #[serde(default)]
    pub default_theme: ThemeMode,
    /// Emit ANSI colors
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_latency_ms() -> u64 {
    1200
}

fn default_keywords() -> Vec<String> {
    crate::classifier::keyword::DEFAULT_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_keyword_weight() -> f64 {
    0.2
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("spamguard-state.json")
}

fn default_color() -> bool {
    true
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            keywords: default_keywords(),
            keyword_weight: default_keyword_weight(),
            seed: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_theme: ThemeMode::default(),
            color: default_color(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl FallbackConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl SpamGuardConfig {
    /// Load layered configuration.
    ///
    /// An explicit `path` must exist. Without one, `spamguard.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                builder = builder.add_source(
                    config::File::new(DEFAULT_CONFIG_FILE, config::FileFormat::Toml)
                        .required(false),
                );
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SPAMGUARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("fallback.keywords"),
        );

        if let Ok(url) = std::env::var("SPAMGUARD_API_URL") {
            builder = builder.set_override("remote.base_url", url)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file only, without environment layering
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamGuardError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SpamGuardError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SpamGuardError::Config(format!("Failed to render config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref base_url) = self.remote.base_url {
            url::Url::parse(base_url).map_err(|e| {
                SpamGuardError::Config(format!("Invalid remote base URL '{}': {}", base_url, e))
            })?;
        }

        let weight = self.fallback.keyword_weight;
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(SpamGuardError::Config(format!(
                "fallback.keyword_weight must be in (0, 1], got {}",
                weight
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SpamGuardConfig::default();
        assert!(config.remote.base_url.is_none());
        assert_eq!(config.fallback.latency_ms, 1200);
        assert_eq!(config.fallback.keywords.len(), 9);
        assert_eq!(config.fallback.keyword_weight, 0.2);
        assert_eq!(config.ui.default_theme, ThemeMode::Light);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[remote]
base_url = "http://localhost:5000"
timeout_secs = 3

[fallback]
latency_ms = 0
seed = 42
"#;
        let config: SpamGuardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.remote.base_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.remote.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.fallback.latency(), Duration::ZERO);
        assert_eq!(config.fallback.seed, Some(42));
        // Unspecified fields keep their defaults
        assert_eq!(config.fallback.keywords.len(), 9);
        assert_eq!(config.storage.path, PathBuf::from("spamguard-state.json"));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = SpamGuardConfig::default();
        config.remote.base_url = Some("not a url".to_string());
        assert!(matches!(config.validate(), Err(SpamGuardError::Config(_))));
    }

    #[test]
    fn test_invalid_keyword_weight() {
        let mut config = SpamGuardConfig::default();
        config.fallback.keyword_weight = 0.0;
        assert!(config.validate().is_err());
        config.fallback.keyword_weight = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[ui]\ndefault_theme = \"dark\"\ncolor = false").unwrap();

        let config = SpamGuardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.ui.default_theme, ThemeMode::Dark);
        assert!(!config.ui.color);

        let config = SpamGuardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ui.default_theme, ThemeMode::Dark);
    }

    #[test]
    fn test_to_toml_round_trip() {
        let mut config = SpamGuardConfig::default();
        config.remote.base_url = Some("https://api.example.com".to_string());

        let rendered = config.to_toml().unwrap();
        let parsed: SpamGuardConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.remote.base_url, config.remote.base_url);
        assert_eq!(parsed.fallback.keywords, config.fallback.keywords);
    }
}
