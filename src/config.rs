use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::journal::DEFAULT_TREND_WINDOW;
use crate::logging::{LogConfig, LogFormat, LogLevel};
use crate::store::JsonFileStore;

/// Keys accepted by [`AppConfig::get`] and [`AppConfig::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "storage.data_file",
    "advice.trend_window",
    "logging.level",
    "logging.format",
];

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where sleep records are kept
    #[serde(default)]
    pub storage: StorageSettings,

    /// Advice preferences
    #[serde(default)]
    pub advice: AdviceSettings,

    /// Logging preferences
    #[serde(default)]
    pub logging: LogConfig,
}

/// Record storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// JSON data file path
    pub data_file: PathBuf,
}

/// Advice settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceSettings {
    /// Nights in the trend window; trend advice waits until this many exist
    pub trend_window: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_file: PathBuf::from("sleep_data.json"),
        }
    }
}

impl Default for AdviceSettings {
    fn default() -> Self {
        AdviceSettings {
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sleeplog")
            .join("config.toml")
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Record store described by this configuration
    pub fn record_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.storage.data_file)
    }

    fn validate(&self) -> Result<()> {
        if self.advice.trend_window == 0 {
            bail!("advice.trend_window must be at least 1");
        }
        Ok(())
    }

    /// Read a setting by dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "storage.data_file" => self.storage.data_file.display().to_string(),
            "advice.trend_window" => self.advice.trend_window.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            "logging.format" => format!("{:?}", self.logging.format).to_lowercase(),
            _ => bail!("Unknown configuration key: {}", key),
        };
        Ok(value)
    }

    /// Change a setting by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storage.data_file" => {
                if value.trim().is_empty() {
                    bail!("storage.data_file cannot be empty");
                }
                self.storage.data_file = PathBuf::from(value);
            }
            "advice.trend_window" => {
                let window: usize = value
                    .parse()
                    .with_context(|| format!("Invalid trend window: {}", value))?;
                if window == 0 {
                    bail!("advice.trend_window must be at least 1");
                }
                self.advice.trend_window = window;
            }
            "logging.level" => {
                self.logging.level = value.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
            }
            "logging.format" => {
                self.logging.format = value.parse::<LogFormat>().map_err(anyhow::Error::msg)?;
            }
            _ => bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }

    /// All settings as `(key, value)` pairs
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}
