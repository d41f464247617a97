use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::UtilsError;
use crate::i18n::Language;
use crate::logging::LoggingConfig;

/// Default alphabet for short URL-safe identifiers
pub const NANOID_ALPHABET: &str = "_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default alphabet for custom-alphabet identifiers
pub const CUSTOM_ID_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Library configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilsConfig {
    pub locale: Language,
    pub number_size_precision: i32,
    pub ids: IdConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    pub nanoid_length: usize,
    pub custom_alphabet: String,
    pub custom_length: usize,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            nanoid_length: 21,
            custom_alphabet: CUSTOM_ID_ALPHABET.to_string(),
            custom_length: 20,
        }
    }
}

impl Default for UtilsConfig {
    fn default() -> Self {
        Self {
            locale: Language::English,
            number_size_precision: 2,
            ids: IdConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl UtilsConfig {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = get_config_path();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            info!("No configuration file found, using defaults");
            Self::default()
        };

        ConfigOverrides::apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;

        info!("Configuration loaded from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: UtilsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to specific file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;

        info!("Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ids.nanoid_length == 0 {
            return Err(UtilsError::config("ids.nanoid_length must be > 0").into());
        }

        if self.ids.custom_length == 0 {
            return Err(UtilsError::config("ids.custom_length must be > 0").into());
        }

        let distinct: HashSet<char> = self.ids.custom_alphabet.chars().collect();
        if distinct.len() < 2 {
            return Err(UtilsError::config("ids.custom_alphabet needs at least 2 distinct characters").into());
        }

        if self.ids.custom_alphabet.chars().count() > 255 {
            return Err(UtilsError::config("ids.custom_alphabet must not exceed 255 characters").into());
        }

        if self.logging.level.trim().is_empty() {
            return Err(UtilsError::config("logging.level must not be empty").into());
        }

        Ok(())
    }
}

/// Get the configuration file path
fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "portalnesia", "utils")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("config.toml"))
}

/// Environment-based configuration overrides
pub struct ConfigOverrides;

impl ConfigOverrides {
    /// Apply environment variable overrides to configuration
    pub fn apply(config: &mut UtilsConfig) {
        Self::apply_with(config, |key| std::env::var(key).ok());
    }

    fn apply_with<F>(config: &mut UtilsConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("PN_UTILS_LOCALE") {
            match Language::from_code(&locale) {
                Some(language) => config.locale = language,
                None => warn!("Ignoring unsupported PN_UTILS_LOCALE: {}", locale),
            }
        }

        if let Some(precision) = lookup("PN_UTILS_PRECISION").and_then(|v| v.parse::<i32>().ok()) {
            config.number_size_precision = precision;
        }

        if let Some(length) = lookup("PN_UTILS_NANOID_LENGTH").and_then(|v| v.parse::<usize>().ok()) {
            config.ids.nanoid_length = length;
        }

        if let Some(level) = lookup("PN_UTILS_LOG_LEVEL") {
            config.logging.level = level;
        }
    }
}
