//! Application state: the phase timer plus everything it reports to.
//!
//! [`App`] owns the timer, the settings, the task list and the statistics,
//! and routes timer events to the cue player, the notifier and the stats
//! recorder. State is read once in [`App::load`] and written back on every
//! mutation as well as in [`App::save`]. Storage failures are logged and
//! never stop the timer.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backup::{Backup, BackupImport};
use crate::cues::{play_cue, Cue, CuePlayer, NullCuePlayer};
use crate::display::title_line;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::notify::{notify_phase, Notifier, NullNotifier};
use crate::settings::Settings;
use crate::stats::{Stats, StatsSummary};
use crate::storage::{KvStore, MemorySettings, MemoryStore, SettingsStore};
use crate::task::{Task, TaskList};
use crate::timer::{Clock, PhaseTimer, TickScheduler, TimerState};

pub const KEY_TIMER: &str = "timer";
pub const KEY_TASKS: &str = "tasks";
pub const KEY_STATS: &str = "stats";
pub const KEY_COMPLETED: &str = "completedWorkSessions";

/// Everything `App` talks to, injected at construction.
pub struct Collaborators {
    pub store: Box<dyn KvStore>,
    pub settings_store: Box<dyn SettingsStore>,
    pub clock: Arc<dyn Clock>,
    pub cues: Box<dyn CuePlayer>,
    pub notifier: Box<dyn Notifier>,
}

impl Collaborators {
    /// In-memory stores and silent backends.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            settings_store: Box::new(MemorySettings::default()),
            clock,
            cues: Box::new(NullCuePlayer),
            notifier: Box::new(NullNotifier),
        }
    }
}

pub struct App {
    timer: PhaseTimer,
    settings: Settings,
    tasks: TaskList,
    stats: Stats,
    store: Box<dyn KvStore>,
    settings_store: Box<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    cues: Box<dyn CuePlayer>,
    notifier: Box<dyn Notifier>,
}

impl App {
    /// Read persisted state, falling back to defaults for anything missing
    /// or unreadable.
    pub fn load(parts: Collaborators) -> Self {
        let Collaborators {
            store,
            settings_store,
            clock,
            cues,
            notifier,
        } = parts;

        let settings = settings_store
            .load()
            .unwrap_or_else(|e| {
                warn!(error = %e, "settings unreadable, using defaults");
                Settings::default()
            })
            .clamped();
        let tasks: TaskList = read_json(store.as_ref(), KEY_TASKS).unwrap_or_default();
        let stats: Stats = read_json(store.as_ref(), KEY_STATS).unwrap_or_default();
        let completed: u64 = read_json(store.as_ref(), KEY_COMPLETED).unwrap_or(0);

        let config = settings.timer_config();
        let state = match read_json::<TimerState>(store.as_ref(), KEY_TIMER) {
            Some(mut state) => {
                state.completed_work_count = completed;
                state
            }
            None => TimerState::fresh(&config, completed),
        };
        // Restoring re-derives an idle phase from the current settings.
        let timer = PhaseTimer::restore(state, config, clock.clone());

        Self {
            timer,
            settings,
            tasks,
            stats,
            store,
            settings_store,
            clock,
            cues,
            notifier,
        }
    }

    /// Replace the tick scheduler driving the timer.
    pub fn with_scheduler(mut self, scheduler: Box<dyn TickScheduler>) -> Self {
        self.timer = self.timer.with_scheduler(scheduler);
        self
    }

    /// Write everything back.
    pub fn save(&mut self) {
        self.persist_timer();
        self.persist_tasks();
        self.persist_stats();
        if let Err(e) = self.settings_store.save(&self.settings) {
            warn!(error = %e, "failed to save settings");
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &PhaseTimer {
        &self.timer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_summary(&self) -> StatsSummary {
        self.stats.summary(self.clock.today())
    }

    pub fn title_line(&self) -> String {
        title_line(
            self.timer.phase(),
            self.timer.status(),
            self.timer.remaining_ms(),
        )
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        let events = self.timer.start();
        self.dispatch(events)
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let events = self.timer.pause();
        self.dispatch(events)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let events = self.timer.reset();
        self.persist_timer();
        self.dispatch(events)
    }

    pub fn skip(&mut self) -> Vec<Event> {
        let events = self.timer.skip();
        self.dispatch(events)
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.timer.tick();
        self.dispatch(events)
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Vec<Event> {
        if self.timer.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Apply new settings. The running phase keeps its duration; the next
    /// phase start picks the new values up.
    ///
    /// # Errors
    ///
    /// Returns the settings store error; the new settings are applied
    /// in memory regardless.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings.clamped();
        self.timer.set_config(self.settings.timer_config());
        self.persist_timer();
        self.settings_store.save(&self.settings)
    }

    /// Set one setting by key.
    ///
    /// # Errors
    ///
    /// Unknown keys and unparsable values leave the settings untouched.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.settings.clone();
        settings.set(key, value)?;
        self.update_settings(settings)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, title: &str, est: u32) -> Result<Task> {
        let task = self.tasks.add(title, est)?.clone();
        self.persist_tasks();
        Ok(task)
    }

    pub fn set_task_done(&mut self, id: &str, done: bool) -> Result<()> {
        self.tasks.set_done(id, done)?;
        self.persist_tasks();
        Ok(())
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> Result<()> {
        self.tasks.rename(id, title)?;
        self.persist_tasks();
        Ok(())
    }

    pub fn add_task_spent(&mut self, id: &str) -> Result<u32> {
        let spent = self.tasks.add_spent(id)?;
        self.persist_tasks();
        Ok(spent)
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task> {
        let task = self.tasks.remove(id)?;
        self.persist_tasks();
        Ok(task)
    }

    pub fn clear_completed_tasks(&mut self) -> usize {
        let removed = self.tasks.clear_completed();
        self.persist_tasks();
        removed
    }

    pub fn reorder_tasks(&mut self, ids: &[String]) {
        self.tasks.reorder(ids);
        self.persist_tasks();
    }

    pub fn move_task(&mut self, id: &str, index: usize) -> Result<()> {
        self.tasks.move_to(id, index)?;
        self.persist_tasks();
        Ok(())
    }

    // ── Statistics and backup ────────────────────────────────────────

    /// Forget all statistics, including the completed work counter.
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
        self.timer.set_completed_work_count(0);
        self.persist_stats();
        self.persist_timer();
    }

    pub fn export_backup(&self) -> Backup {
        Backup {
            settings: self.settings.clone(),
            tasks: self.tasks.clone(),
            stats: self.stats.clone(),
            completed_work_sessions: self.timer.completed_work_count(),
        }
    }

    /// Apply a backup document.
    ///
    /// # Errors
    ///
    /// `CoreError::Import` for malformed documents; nothing is changed then.
    pub fn import_backup(&mut self, text: &str) -> Result<BackupImport> {
        let import = BackupImport::parse(text)?;

        if let Some(settings) = &import.settings {
            if let Err(e) = self.update_settings(settings.clone()) {
                warn!(error = %e, "imported settings not saved");
            }
        }
        if let Some(tasks) = &import.tasks {
            self.tasks = tasks.clone();
            self.persist_tasks();
        }
        if let Some(stats) = &import.stats {
            self.stats = stats.clone();
            self.persist_stats();
        }
        if let Some(count) = import.completed_work_sessions {
            self.timer.set_completed_work_count(count);
            self.persist_timer();
        }
        Ok(import)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&mut self, events: Vec<Event>) -> Vec<Event> {
        let mut changed = false;
        for event in &events {
            match event {
                Event::Started { .. } => {
                    changed = true;
                    play_cue(self.cues.as_mut(), Cue::Start, &self.settings);
                }
                Event::Paused { .. } => {
                    changed = true;
                    play_cue(self.cues.as_mut(), Cue::Pause, &self.settings);
                }
                Event::WorkPhaseCompleted { minutes, .. } => {
                    changed = true;
                    self.stats.record(self.clock.today(), *minutes);
                    self.persist_stats();
                    play_cue(self.cues.as_mut(), Cue::WorkDone, &self.settings);
                }
                Event::BreakCompleted { .. } => {
                    changed = true;
                    play_cue(self.cues.as_mut(), Cue::BreakDone, &self.settings);
                }
                Event::PhaseChanged { .. } => {
                    changed = true;
                    play_cue(self.cues.as_mut(), Cue::Transition, &self.settings);
                }
                Event::PhaseCompletionNotified { phase, .. } => {
                    notify_phase(self.notifier.as_mut(), *phase, self.settings.notifications);
                }
                Event::TickUpdated { .. } | Event::StateSnapshot { .. } => {}
            }
        }
        if changed {
            self.persist_timer();
        }
        events
    }

    fn persist_timer(&mut self) {
        write_json(self.store.as_mut(), KEY_TIMER, self.timer.state());
        write_json(
            self.store.as_mut(),
            KEY_COMPLETED,
            &self.timer.completed_work_count(),
        );
    }

    fn persist_tasks(&mut self) {
        write_json(self.store.as_mut(), KEY_TASKS, &self.tasks);
    }

    fn persist_stats(&mut self) {
        write_json(self.store.as_mut(), KEY_STATS, &self.stats);
    }
}

fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value unreadable, using default");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "store read failed, using default");
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized>(store: &mut dyn KvStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(CoreError::from)
        .and_then(|raw| store.set(key, &raw));
    match result {
        Ok(()) => debug!(key, "persisted"),
        Err(e) => warn!(key, error = %e, "failed to persist"),
    }
}
