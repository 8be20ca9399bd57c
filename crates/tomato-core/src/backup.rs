//! JSON backup of settings, tasks, statistics and the work counter.
//!
//! Import is all-or-nothing: a document that does not parse completely is
//! rejected and nothing is applied.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::settings::Settings;
use crate::stats::Stats;
use crate::task::TaskList;

/// Suggested file name for exports.
pub const BACKUP_FILE_NAME: &str = "tomato-pomodoro-backup.json";

/// Imported counters are capped here.
pub const MAX_IMPORTED_COUNT: u64 = u32::MAX as u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub settings: Settings,
    pub tasks: TaskList,
    pub stats: Stats,
    pub completed_work_sessions: u64,
}

/// A parsed import. Absent sections leave the current data alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupImport {
    pub settings: Option<Settings>,
    pub tasks: Option<TaskList>,
    pub stats: Option<Stats>,
    pub completed_work_sessions: Option<u64>,
}

impl Backup {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl BackupImport {
    /// Parse a backup document.
    ///
    /// # Errors
    ///
    /// `CoreError::Import` when the text is not a JSON object or any present
    /// section is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CoreError::Import(e.to_string()))?;
        if !value.is_object() {
            return Err(CoreError::Import("backup must be a JSON object".into()));
        }
        let mut import: BackupImport =
            serde_json::from_value(value).map_err(|e| CoreError::Import(e.to_string()))?;
        import.settings = import.settings.map(Settings::clamped);
        import.tasks = import.tasks.map(TaskList::clamped);
        import.stats = import.stats.map(|s| s.bounded(MAX_IMPORTED_COUNT));
        import.completed_work_sessions = import
            .completed_work_sessions
            .map(|n| n.min(MAX_IMPORTED_COUNT));
        Ok(import)
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
            && self.tasks.is_none()
            && self.stats.is_none()
            && self.completed_work_sessions.is_none()
    }
}
