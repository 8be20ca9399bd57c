//! TOML-based settings file.
//!
//! Stored at `<data dir>/settings.toml`. A missing file yields defaults and
//! is written back on first load; values are clamped on every load.

use std::path::{Path, PathBuf};

use super::{data_dir, SettingsStore};
use crate::error::{ConfigError, Result};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file in the data directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("settings.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, settings: &Settings) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content =
            toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }
}

impl SettingsStore for SettingsFile {
    /// Load from disk or return (and persist) defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default settings cannot be written.
    fn load(&self) -> Result<Settings> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let settings: Settings =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })?;
                Ok(settings.clamped())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Settings::default();
                self.write(&settings)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.write(settings)
    }
}
