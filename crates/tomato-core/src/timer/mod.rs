mod clock;
mod engine;
mod phase;

pub use clock::{Clock, ManualClock, SystemClock, TickFlag, TickScheduler};
pub use engine::{PhaseTimer, TimerState, TimerStatus};
pub use phase::{
    minutes_to_ms, ms_to_minutes, Phase, PhaseCategory, TimerConfig, MAX_PHASE_MINUTES,
};
