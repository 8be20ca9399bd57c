//! # Tomato Core Library
//!
//! This library provides the core logic for the Tomato Pomodoro timer. The
//! `tomato` CLI is a thin host over it: everything the user can do is an
//! operation on [`App`].
//!
//! ## Architecture
//!
//! - **Phase Timer**: A wall-clock-based state machine (work, short break,
//!   long break) that requires the host to call `tick()` while it is armed
//! - **Collaborators**: settings, statistics, tasks, cues and notifications,
//!   wired to timer events by [`App`]
//! - **Storage**: SQLite key-value store and a TOML settings file
//! - **Offline cache**: versioned cache-first asset store
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Core timer state machine
//! - [`App`]: Application state with explicit load/save lifecycle
//! - [`Settings`]: User preferences, clamped at the boundary
//! - [`Stats`]: Completed work sessions and streaks

pub mod app;
pub mod backup;
pub mod cues;
pub mod display;
pub mod error;
pub mod events;
pub mod notify;
pub mod offline;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::{App, Collaborators};
pub use backup::{Backup, BackupImport};
pub use cues::{Cue, CuePlayer, NullCuePlayer};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use notify::{Notification, Notifier, NullNotifier};
pub use settings::Settings;
pub use stats::{Stats, StatsSummary};
pub use storage::{Database, KvStore, SettingsFile, SettingsStore};
pub use task::{Task, TaskList};
pub use timer::{
    Clock, ManualClock, Phase, PhaseTimer, SystemClock, TickFlag, TickScheduler, TimerConfig,
    TimerState, TimerStatus,
};
