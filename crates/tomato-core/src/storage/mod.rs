//! Persistence collaborators.
//!
//! The application state is kept behind two small traits: a string
//! key-value store for timer state, tasks and statistics, and a settings
//! store. Production uses SQLite and a TOML file under the data directory;
//! tests use the in-memory versions.

mod database;
mod memory;
mod settings_file;

pub use database::Database;
pub use memory::{MemorySettings, MemoryStore};
pub use settings_file::SettingsFile;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Opaque string key-value store.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

pub trait SettingsStore: Send {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Returns the data directory, creating it if needed.
///
/// `TOMATO_DATA_DIR` wins when set. Otherwise `~/.config/tomato[-dev]/`,
/// with `TOMATO_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TOMATO_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOMATO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomato-dev")
            } else {
                base_dir.join("tomato")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
