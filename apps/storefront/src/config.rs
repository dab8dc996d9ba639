//! # Storefront Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                               │
//! │  2. storefront.toml in the platform config dir                         │
//! │     ~/.config/folio-storefront/storefront.toml (Linux)                 │
//! │     ~/Library/Application Support/com.folio.storefront/... (macOS)     │
//! │  3. Environment variables                                              │
//! │     FOLIO_DB_PATH, FOLIO_STORE_NAME, FOLIO_CURRENCY_SYMBOL             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! store_name = "Folio Books"
//! currency_symbol = "$"
//! database_path = "/var/lib/folio/folio.db"
//! ```
//!
//! Read-only after startup, so no mutex.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use folio_core::Money;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Shown in the header and on the receipt.
    pub store_name: String,

    /// Prefix for formatted amounts.
    pub currency_symbol: String,

    /// Local storage file. `None` uses the platform data dir.
    pub database_path: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            store_name: "Folio Books".to_string(),
            currency_symbol: "$".to_string(),
            database_path: None,
        }
    }
}

impl StorefrontConfig {
    /// Loads from file (if present) and environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = StorefrontConfig::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads config or falls back to defaults (plus environment) on error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            let mut config = StorefrontConfig::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `FOLIO_*` overrides from `lookup` (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("FOLIO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("FOLIO_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("FOLIO_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }
        Ok(())
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "folio", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(5)), "$0.05");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1050)), "-$10.50");
    }

    #[test]
    fn test_custom_symbol() {
        let config = StorefrontConfig {
            currency_symbol: "MX$".to_string(),
            ..StorefrontConfig::default()
        };
        assert_eq!(config.format_currency(Money::from_cents(19900)), "MX$199.00");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FOLIO_DB_PATH", "/tmp/folio-test.db"),
            ("FOLIO_STORE_NAME", "Librería Centro"),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/folio-test.db")));
        assert_eq!(config.store_name, "Librería Centro");
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: StorefrontConfig = toml::from_str(r#"store_name = "Folio Norte""#).unwrap();
        assert_eq!(config.store_name, "Folio Norte");
        assert_eq!(config.currency_symbol, "$");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_blank_store_name_is_invalid() {
        let config = StorefrontConfig {
            store_name: "  ".to_string(),
            ..StorefrontConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            StorefrontConfig::load(Some(PathBuf::from("/nonexistent/folio/storefront.toml"))).unwrap();
        assert!(!config.store_name.is_empty());
    }
}
