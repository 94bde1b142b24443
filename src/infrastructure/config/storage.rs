//! On-disk location and persistence of `config.toml`.

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Failure to locate, read or write the configuration file.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no platform configuration directory available")]
    NoConfigDir,
    #[error("config file {path:?} has no parent directory")]
    NoParent { path: PathBuf },
    #[error("config file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Reads and writes the application config file.
#[derive(Debug, Clone)]
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory, e.g. `~/.config/pokegrid` on Linux.
    ///
    /// # Errors
    /// Returns error if the platform has no config directory.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::with_dir(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Uses an explicit directory.
    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    #[must_use]
    pub fn default_config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads `path_override`, or `config.toml` in the config directory.
    ///
    /// A missing file is created with defaults. A file that does not parse is
    /// left untouched and defaults are returned.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.default_config_path(), Path::to_path_buf);

        if !path.exists() {
            info!(path = %path.display(), "No config file, writing defaults");
            let config = AppConfig::default();
            Self::write_atomic(&path, &config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config = toml::from_str::<AppConfig>(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
            AppConfig::default()
        });
        debug!(path = %path.display(), "Config loaded");

        Ok(config)
    }

    /// Writes `config` to `config.toml` in the config directory.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        Self::write_atomic(&self.default_config_path(), config)
    }

    /// Writes through a temp file in the target directory, then renames.
    fn write_atomic(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        let parent = path.parent().ok_or_else(|| ConfigError::NoParent {
            path: path.to_path_buf(),
        })?;
        fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}
