//! Application settings.
//!
//! Stored as `settings.toml` in the platform config folder:
//! - Linux: ~/.config/crud-console/
//! - macOS: ~/Library/Application Support/com.crud-console.crud-console/
//! - Windows: %APPDATA%/crud-console/crud-console/config/

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::anyhow;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::column::DEFAULT_MIN_VISIBLE;
use crate::domain::entities::filter::DEFAULT_LIMIT;
use crate::usecase::services::search_debounce::DEFAULT_QUIET_PERIOD;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "crud-console";
const APP_NAME: &str = "crud-console";
const CONFIG_FILENAME: &str = "settings.toml";
const DB_FILENAME: &str = "views.sqlite";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub page_size: u32,
    pub debounce_ms: u64,
    pub min_visible_columns: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_LIMIT,
            debounce_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            min_visible_columns: DEFAULT_MIN_VISIBLE,
        }
    }
}

impl TableSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub persist_filters: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            persist_filters: true,
            db_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub table: TableSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.page_size == 0 {
            return Err(ConfigError::Invalid(
                "table.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Explicit `storage.db_path`, else the platform data folder.
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let project_dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join(DB_FILENAME))
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// How [`resolve_config`] arrived at its settings. Kept so the outcome can be
/// logged once the subscriber is installed, which needs the loaded level.
#[derive(Debug)]
pub enum ConfigSource {
    Loaded(PathBuf),
    Missing(PathBuf),
    Unusable(ConfigError),
    NoPath,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Loaded(path) => {
                tracing::info!(path = %path.display(), "loaded settings");
            }
            ConfigSource::Missing(path) => {
                tracing::info!(path = %path.display(), "no settings file, using defaults");
            }
            ConfigSource::Unusable(err) => {
                tracing::warn!(error = %err, "unusable settings file, using defaults");
            }
            ConfigSource::NoPath => {
                tracing::warn!("could not determine settings path, using defaults");
            }
        }
    }
}

/// Loads the settings file at `path`, falling back to defaults when it is
/// missing or unusable.
pub fn resolve_config(path: Option<PathBuf>) -> (AppConfig, ConfigSource) {
    let Some(path) = path else {
        return (AppConfig::default(), ConfigSource::NoPath);
    };

    match load_config_from(&path) {
        Ok(config) => (config, ConfigSource::Loaded(path)),
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            (AppConfig::default(), ConfigSource::Missing(path))
        }
        Err(err) => (AppConfig::default(), ConfigSource::Unusable(err)),
    }
}
