use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KvStore, SettingsStore};
use crate::error::Result;
use crate::settings::Settings;

/// In-memory key-value store. Clones share the same map, so a test can keep
/// a handle and inspect what the application wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory settings store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    settings: Arc<Mutex<Option<Settings>>>,
}

impl MemorySettings {
    pub fn with(settings: Settings) -> Self {
        Self {
            settings: Arc::new(Mutex::new(Some(settings))),
        }
    }

    /// What was last saved, if anything.
    pub fn saved(&self) -> Option<Settings> {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Settings> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn settings_default_until_saved() {
        let mut store = MemorySettings::default();
        assert_eq!(store.load().unwrap(), Settings::default());
        let custom = Settings {
            work: 50,
            ..Settings::default()
        };
        store.save(&custom).unwrap();
        assert_eq!(store.load().unwrap().work, 50);
    }
}
