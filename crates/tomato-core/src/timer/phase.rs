use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: u64 = 60 * 1000;

/// Longest phase any settings value can produce.
pub const MAX_PHASE_MINUTES: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "work")]
    Work,
    #[serde(rename = "short")]
    ShortBreak,
    #[serde(rename = "long")]
    LongBreak,
}

/// Coarse grouping used for auto-start flags and notification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseCategory {
    Focus,
    Break,
}

impl Phase {
    pub fn category(self) -> PhaseCategory {
        match self {
            Phase::Work => PhaseCategory::Focus,
            Phase::ShortBreak | Phase::LongBreak => PhaseCategory::Break,
        }
    }

    pub fn is_break(self) -> bool {
        self.category() == PhaseCategory::Break
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Glyph shown in front of the title line.
    pub fn glyph(self) -> &'static str {
        match self {
            Phase::Work => "🍅",
            Phase::ShortBreak => "🍊",
            Phase::LongBreak => "🍇",
        }
    }
}

/// Durations and transition policy read by [`super::PhaseTimer`].
///
/// Values are expected to be clamped already (see `Settings::clamped`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work_min: u64,
    pub short_min: u64,
    pub long_min: u64,
    /// Completed work phases between long breaks.
    pub long_every: u64,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
}

impl TimerConfig {
    pub fn duration_min(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_min,
            Phase::ShortBreak => self.short_min,
            Phase::LongBreak => self.long_min,
        }
    }

    /// Phase duration in milliseconds.
    ///
    /// Uses saturating arithmetic so absurd minute values cannot overflow.
    pub fn duration_ms(&self, phase: Phase) -> u64 {
        minutes_to_ms(self.duration_min(phase))
    }

    /// Which break follows the given number of completed work phases.
    pub fn break_after(&self, completed_work_count: u64) -> Phase {
        let every = self.long_every.max(1);
        if completed_work_count > 0 && completed_work_count % every == 0 {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }

    /// Upper bound for a captured phase duration under this config.
    pub fn max_duration_ms(&self) -> u64 {
        let longest = MAX_PHASE_MINUTES
            .max(self.work_min)
            .max(self.short_min)
            .max(self.long_min);
        minutes_to_ms(longest)
    }

    pub fn auto_starts(&self, phase: Phase) -> bool {
        match phase.category() {
            PhaseCategory::Focus => self.auto_start_work,
            PhaseCategory::Break => self.auto_start_breaks,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_min: 25,
            short_min: 5,
            long_min: 15,
            long_every: 4,
            auto_start_breaks: true,
            auto_start_work: true,
        }
    }
}

pub fn minutes_to_ms(minutes: u64) -> u64 {
    minutes.saturating_mul(MS_PER_MINUTE)
}

/// Whole minutes, rounded to nearest.
pub fn ms_to_minutes(ms: u64) -> u64 {
    ms.saturating_add(MS_PER_MINUTE / 2) / MS_PER_MINUTE
}
