use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    /// Override the log directory (default: `<data_dir>/logs`).
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/tagmap/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!(
                    "Failed to parse config at {}: {e}, using defaults",
                    config_path.display()
                );
                Self::default()
            }),
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let config = toml::from_str(contents)?;
        log::info!("Loaded config");
        Ok(config)
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("tagmap"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Resolved log directory.
    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("logs"))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("tagmap").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
