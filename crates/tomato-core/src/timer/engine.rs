//! Phase timer implementation.
//!
//! The phase timer is a wall-clock-based state machine. It does not use
//! internal threads - the host is responsible for calling `tick()` for as
//! long as the injected [`TickScheduler`] stays armed.
//!
//! Remaining time while running is always derived from an absolute end
//! instant, never decremented per tick, so a throttled or starved host
//! cannot make the countdown drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |
//!   +--------+  (phase completion: next phase enters Idle,
//!                or Running again when auto-start is on)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(config, Arc::new(SystemClock));
//! timer.start();
//! while timer.is_ticking() {
//!     for event in timer.tick() { /* render, play cues, record stats */ }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::clock::{Clock, TickFlag, TickScheduler};
use super::phase::{ms_to_minutes, Phase, TimerConfig};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Freshly entered phase, never started.
    Idle,
    Running,
    Paused,
}

/// The mutable record behind [`PhaseTimer`].
///
/// Serializable so hosts can persist it between process runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub status: TimerStatus,
    /// Absolute end of the countdown (epoch ms). Present only while running.
    #[serde(default)]
    pub target_end_ms: Option<u64>,
    /// Authoritative while idle or paused.
    pub remaining_ms: u64,
    /// Nominal duration captured when the phase started.
    pub phase_duration_ms: u64,
    #[serde(default)]
    pub completed_work_count: u64,
}

impl TimerState {
    /// Idle work phase with the full configured duration.
    pub fn fresh(config: &TimerConfig, completed_work_count: u64) -> Self {
        let duration = config.duration_ms(Phase::Work);
        Self {
            phase: Phase::Work,
            status: TimerStatus::Idle,
            target_end_ms: None,
            remaining_ms: duration,
            phase_duration_ms: duration,
            completed_work_count,
        }
    }

    /// Repair a state loaded from outside so the invariants hold again.
    ///
    /// A captured duration that `config` could never have produced is
    /// replaced with the configured one and the countdown starts over.
    pub fn normalized(mut self, config: &TimerConfig) -> Self {
        if self.phase_duration_ms > config.max_duration_ms() {
            let duration = config.duration_ms(self.phase);
            self.status = TimerStatus::Idle;
            self.target_end_ms = None;
            self.phase_duration_ms = duration;
            self.remaining_ms = duration;
            return self;
        }
        match (self.status, self.target_end_ms) {
            (TimerStatus::Running, None) => self.status = TimerStatus::Paused,
            (TimerStatus::Idle | TimerStatus::Paused, Some(_)) => self.target_end_ms = None,
            _ => {}
        }
        self.remaining_ms = self.remaining_ms.min(self.phase_duration_ms);
        self
    }
}

/// Core phase timer.
///
/// Every command returns the events it produced, in emission order.
pub struct PhaseTimer {
    config: TimerConfig,
    state: TimerState,
    clock: Arc<dyn Clock>,
    scheduler: Box<dyn TickScheduler>,
}

impl fmt::Debug for PhaseTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseTimer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("ticking", &self.scheduler.is_armed())
            .finish()
    }
}

impl PhaseTimer {
    /// Create an idle timer on a fresh work phase.
    pub fn new(config: TimerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::restore(TimerState::fresh(&config, 0), config, clock)
    }

    /// Resume from a previously persisted state.
    ///
    /// A running state stays running: its end instant is absolute, so any
    /// time that passed while the host was gone is accounted for on the
    /// next `tick()`. An idle phase has not started yet and takes its
    /// duration from `config`.
    pub fn restore(state: TimerState, config: TimerConfig, clock: Arc<dyn Clock>) -> Self {
        let mut timer = Self {
            config,
            state: state.normalized(&config),
            clock,
            scheduler: Box::new(TickFlag::default()),
        };
        timer.set_config(config);
        if timer.state.status == TimerStatus::Running {
            timer.scheduler.arm();
        }
        timer
    }

    /// Swap the tick scheduler, carrying over whether it is armed.
    pub fn with_scheduler(mut self, mut scheduler: Box<dyn TickScheduler>) -> Self {
        if self.scheduler.is_armed() {
            scheduler.arm();
        } else {
            scheduler.cancel();
        }
        self.scheduler = scheduler;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.status == TimerStatus::Running
    }

    /// Whether the host should keep calling `tick()`.
    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn completed_work_count(&self) -> u64 {
        self.state.completed_work_count
    }

    pub fn total_ms(&self) -> u64 {
        self.state.phase_duration_ms
    }

    /// Remaining time, live while running.
    pub fn remaining_ms(&self) -> u64 {
        match (self.state.status, self.state.target_end_ms) {
            (TimerStatus::Running, Some(end)) => end
                .saturating_sub(self.clock.now_ms())
                .min(self.state.phase_duration_ms),
            _ => self.state.remaining_ms,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress_ratio(&self) -> f64 {
        progress(self.state.phase_duration_ms, self.remaining_ms())
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let remaining_ms = self.remaining_ms();
        Event::StateSnapshot {
            phase: self.state.phase,
            status: self.state.status,
            remaining_ms,
            total_ms: self.state.phase_duration_ms,
            progress_ratio: progress(self.state.phase_duration_ms, remaining_ms),
            completed_work_count: self.state.completed_work_count,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Running {
            return Vec::new();
        }
        let now = self.clock.now_ms();
        self.state.target_end_ms = Some(now.saturating_add(self.state.remaining_ms));
        self.state.status = TimerStatus::Running;
        self.scheduler.arm();
        vec![Event::Started {
            phase: self.state.phase,
            remaining_ms: self.state.remaining_ms,
            at: self.clock.now(),
        }]
    }

    /// Pause a running countdown.
    ///
    /// A countdown that already reached zero but was not ticked yet is
    /// completed instead, so pausing never leaves a dead phase behind.
    pub fn pause(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Running {
            return Vec::new();
        }
        let remaining = self.remaining_ms();
        if remaining == 0 {
            return self.complete_phase();
        }
        self.state.remaining_ms = remaining;
        self.state.target_end_ms = None;
        self.state.status = TimerStatus::Paused;
        self.scheduler.cancel();
        vec![Event::Paused {
            phase: self.state.phase,
            remaining_ms: remaining,
            at: self.clock.now(),
        }]
    }

    /// Back to the start of the current phase, re-reading its duration.
    pub fn reset(&mut self) -> Vec<Event> {
        self.scheduler.cancel();
        let duration = self.config.duration_ms(self.state.phase);
        self.state.status = TimerStatus::Idle;
        self.state.target_end_ms = None;
        self.state.phase_duration_ms = duration;
        self.state.remaining_ms = duration;
        Vec::new()
    }

    /// Complete the current phase right now, whatever is left on it.
    pub fn skip(&mut self) -> Vec<Event> {
        self.complete_phase()
    }

    /// Call while `is_ticking()`. Completes at most one phase per call.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Running {
            return Vec::new();
        }
        let remaining = self.remaining_ms();
        if remaining == 0 {
            return self.complete_phase();
        }
        self.scheduler.arm();
        vec![Event::TickUpdated {
            remaining_ms: remaining,
            progress_ratio: progress(self.state.phase_duration_ms, remaining),
        }]
    }

    /// Replace the configuration.
    ///
    /// Phases already under way keep their captured duration; an idle phase
    /// has not started yet and picks up the new duration immediately.
    pub fn set_config(&mut self, config: TimerConfig) {
        self.config = config;
        if self.state.status == TimerStatus::Idle {
            let duration = config.duration_ms(self.state.phase);
            self.state.phase_duration_ms = duration;
            self.state.remaining_ms = duration;
        }
    }

    /// Overwrite the completed work counter (statistics reset or import).
    pub fn set_completed_work_count(&mut self, count: u64) {
        self.state.completed_work_count = count;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Vec<Event> {
        let finished = self.state.phase;
        let at = self.clock.now();
        let mut events = Vec::with_capacity(5);

        let next = match finished {
            Phase::Work => {
                self.state.completed_work_count =
                    self.state.completed_work_count.saturating_add(1);
                events.push(Event::WorkPhaseCompleted {
                    minutes: ms_to_minutes(self.state.phase_duration_ms),
                    completed_work_count: self.state.completed_work_count,
                    at,
                });
                self.config.break_after(self.state.completed_work_count)
            }
            Phase::ShortBreak | Phase::LongBreak => {
                events.push(Event::BreakCompleted { phase: finished, at });
                Phase::Work
            }
        };

        self.enter_phase(next);
        info!(from = ?finished, to = ?next, completed = self.state.completed_work_count, "phase completed");
        events.push(Event::PhaseChanged {
            phase: next,
            duration_ms: self.state.phase_duration_ms,
            at,
        });

        if self.config.auto_starts(next) {
            events.extend(self.start());
        }

        events.push(Event::PhaseCompletionNotified { phase: next, at });
        events
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.scheduler.cancel();
        let duration = self.config.duration_ms(phase);
        self.state.phase = phase;
        self.state.status = TimerStatus::Idle;
        self.state.target_end_ms = None;
        self.state.phase_duration_ms = duration;
        self.state.remaining_ms = duration;
    }
}

fn progress(total_ms: u64, remaining_ms: u64) -> f64 {
    if total_ms == 0 {
        return 0.0;
    }
    let elapsed = total_ms.saturating_sub(remaining_ms);
    (elapsed as f64 / total_ms as f64).clamp(0.0, 1.0)
}
