//! Subcommand handlers and the wiring they share.

pub mod backup;
pub mod config;
pub mod run;
pub mod stats;
pub mod task;
pub mod timer;

use std::io::Write;
use std::sync::Arc;

use tomato_core::cues::CueError;
use tomato_core::notify::NotifyError;
use tomato_core::storage::data_dir;
use tomato_core::{
    App, Collaborators, Cue, CuePlayer, Database, Notification, Notifier, SettingsFile,
    SystemClock,
};

/// Rings the terminal bell once per tone.
struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&mut self, cue: Cue, _volume: f64) -> Result<(), CueError> {
        let bells = "\x07".repeat(cue.tones().len());
        let mut err = std::io::stderr();
        err.write_all(bells.as_bytes())
            .and_then(|_| err.flush())
            .map_err(|e| CueError::Playback(e.to_string()))
    }
}

/// Prints notifications to stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        writeln!(std::io::stderr(), "[{}] {}", notification.title, notification.body)
            .map_err(|e| NotifyError::Backend(e.to_string()))
    }
}

/// Load the application from the data directory.
pub fn open_app() -> Result<App, Box<dyn std::error::Error>> {
    tracing::debug!(dir = %data_dir()?.display(), "loading application state");
    Ok(App::load(Collaborators {
        store: Box::new(Database::open()?),
        settings_store: Box::new(SettingsFile::default_location()?),
        clock: Arc::new(SystemClock),
        cues: Box::new(TerminalBell),
        notifier: Box::new(StderrNotifier),
    }))
}
