use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerStatus};

/// Every timer state change produces an Event.
/// The host prints or renders them; `App` routes them to cues, stats and
/// notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Started {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    Paused {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// Carries the nominal duration of the finished work phase, not the
    /// wall-clock time actually spent in it.
    WorkPhaseCompleted {
        minutes: u64,
        completed_work_count: u64,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        phase: Phase,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TickUpdated {
        remaining_ms: u64,
        progress_ratio: f64,
    },
    PhaseCompletionNotified {
        phase: Phase,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        status: TimerStatus,
        remaining_ms: u64,
        total_ms: u64,
        progress_ratio: f64,
        completed_work_count: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// snake_case name, as used in the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Started { .. } => "started",
            Event::Paused { .. } => "paused",
            Event::WorkPhaseCompleted { .. } => "work_phase_completed",
            Event::BreakCompleted { .. } => "break_completed",
            Event::PhaseChanged { .. } => "phase_changed",
            Event::TickUpdated { .. } => "tick_updated",
            Event::PhaseCompletionNotified { .. } => "phase_completion_notified",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
