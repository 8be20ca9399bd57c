//! Time sources and tick scheduling for the phase timer.
//!
//! The timer never sleeps and never spawns anything. It reads "now" from a
//! [`Clock`] and asks a [`TickScheduler`] to keep (or stop) calling `tick()`.
//! Hosts decide the cadence; tests swap in [`ManualClock`] and step time by
//! hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms() as i64)
            .single()
            .unwrap_or_default()
    }

    /// Current UTC calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Deterministic clock that only moves when told to.
///
/// Clones share the same underlying instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Start at midnight UTC of the given day.
    pub fn at_day(day: NaiveDate) -> Self {
        let ms = day
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis().max(0) as u64)
            .unwrap_or(0);
        Self::new(ms)
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs.saturating_mul(1000));
    }

    pub fn advance_min(&self, min: u64) {
        self.advance_secs(min.saturating_mul(60));
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// A cancellable repeating task, as seen from the timer.
///
/// The timer arms it on `start()` and cancels it on `pause()`, `reset()` and
/// phase completion. The host keeps calling `PhaseTimer::tick` for as long
/// as it stays armed.
pub trait TickScheduler: Send {
    fn arm(&mut self);
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
}

/// Plain armed/disarmed flag polled by the host loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickFlag {
    armed: bool,
}

impl TickScheduler for TickFlag {
    fn arm(&mut self) {
        self.armed = true;
    }

    fn cancel(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}
