//! Text rendering helpers shared by hosts.

use crate::timer::{Phase, TimerStatus};

pub const APP_NAME: &str = "Tomato Pomodoro";

/// `MM:SS`, rounded to the nearest second. Minutes are not wrapped at 60.
pub fn format_clock(ms: u64) -> String {
    let total_secs = (ms + 500) / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// One-line status, e.g. `🍅 24:59 — Tomato Pomodoro`.
pub fn title_line(phase: Phase, status: TimerStatus, remaining_ms: u64) -> String {
    let time = format_clock(remaining_ms);
    if status == TimerStatus::Running {
        format!("{} {time} — {APP_NAME}", phase.glyph())
    } else {
        format!("{} {time} • paused — {APP_NAME}", phase.glyph())
    }
}

/// Fixed-width bar for a progress ratio in `[0, 1]`.
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.extend(std::iter::repeat('#').take(filled));
    bar.extend(std::iter::repeat('-').take(width - filled));
    bar.push(']');
    bar
}
