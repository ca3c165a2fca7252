//! Application configuration.
//!
//! Settings come from an optional TOML file; every section and key may be
//! omitted and falls back to its default. Command-line flags are applied on
//! top with [`AppConfig::apply_overrides`].
//!
//! ```toml
//! [calculator]
//! default_rate = "18"
//! presets = ["0", "5", "12", "18", "28"]
//!
//! [history]
//! key = "gst_history"
//! debounce_ms = 1500
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "gst.db"
//!
//! [logging]
//! level = "info"
//! file = "gst.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use gst_core::DEFAULT_RATE;
use gst_core::calculations::common::MAX_RATE;
use gst_core::history::{DEFAULT_DEBOUNCE, DEFAULT_HISTORY_KEY};
use gst_core::input::DEFAULT_PRESETS;
use gst_core::store::StoreConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "gst.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub default_rate: Decimal,
    pub presets: Vec<Decimal>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_rate: DEFAULT_RATE,
            presets: DEFAULT_PRESETS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub key: String,
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_HISTORY_KEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

/// The `[store]` section, mirrored into a [`StoreConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        let StoreConfig {
            backend,
            connection_string,
        } = StoreConfig::default();
        Self {
            backend,
            connection_string,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calculator: CalculatorConfig,
    pub history: HistoryConfig,
    pub store: StoreSection,
    pub logging: LoggingConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub db: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading config");
        Self::from_toml_str(&text)
    }

    /// Loads `path` when given, else [`DEFAULT_CONFIG_FILE`] if it exists in
    /// the working directory, else the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn apply_overrides(
        &mut self,
        overrides: Overrides,
    ) {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(db) = overrides.db {
            self.store.connection_string = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = Some(level);
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend.clone(),
            connection_string: self.store.connection_string.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.history.debounce_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |rate: &Decimal| *rate >= Decimal::ZERO && *rate <= MAX_RATE;

        if !in_range(&self.calculator.default_rate) {
            return Err(ConfigError::Invalid(format!(
                "default_rate {} is outside 0..=100",
                self.calculator.default_rate
            )));
        }
        if self.calculator.presets.is_empty() {
            return Err(ConfigError::Invalid("presets must not be empty".to_string()));
        }
        if let Some(bad) = self.calculator.presets.iter().find(|rate| !in_range(rate)) {
            return Err(ConfigError::Invalid(format!(
                "preset {bad} is outside 0..=100"
            )));
        }
        if self.history.key.trim().is_empty() {
            return Err(ConfigError::Invalid("history key must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config is valid");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.calculator.default_rate, dec!(18));
        assert_eq!(config.calculator.presets, DEFAULT_PRESETS.to_vec());
        assert_eq!(config.history.key, "gst_history");
        assert_eq!(config.debounce(), Duration::from_millis(1500));
        assert_eq!(config.store_config(), StoreConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [history]
            debounce_ms = 250

            [store]
            backend = "memory"
            "#,
        )
        .expect("should parse");

        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.history.key, "gst_history");
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection_string, "gst.db");
    }

    #[test]
    fn decimals_accept_strings_and_numbers() {
        let config = AppConfig::from_toml_str(
            r#"
            [calculator]
            default_rate = 12
            presets = ["0", "3", 12.5]
            "#,
        )
        .expect("should parse");

        assert_eq!(config.calculator.default_rate, dec!(12));
        assert_eq!(config.calculator.presets, vec![dec!(0), dec!(3), dec!(12.5)]);
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let default_rate = AppConfig::from_toml_str("[calculator]\ndefault_rate = 120\n");
        let preset = AppConfig::from_toml_str("[calculator]\npresets = [\"5\", \"-1\"]\n");

        assert!(matches!(default_rate, Err(ConfigError::Invalid(_))));
        assert!(matches!(preset, Err(ConfigError::Invalid(msg)) if msg.contains("-1")));
    }

    #[test]
    fn empty_presets_are_rejected() {
        let result = AppConfig::from_toml_str("[calculator]\npresets = []\n");

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = AppConfig::from_toml_str("[history\nkey = ");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::default();

        config.apply_overrides(Overrides {
            backend: Some("memory".to_string()),
            db: Some(":memory:".to_string()),
            log_level: Some("debug".to_string()),
            log_file: None,
        });

        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection_string, ":memory:");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[logging]\nlevel = \"warn\"\nfile = \"gst.log\"").expect("write config");

        let config = AppConfig::load(file.path()).expect("should load");

        assert_eq!(config.logging.level.as_deref(), Some("warn"));
        assert_eq!(config.logging.file, Some(PathBuf::from("gst.log")));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let result = AppConfig::discover(Some(Path::new("/nonexistent-dir/gst.toml")));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
