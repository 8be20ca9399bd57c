//! Audio cues played on timer events.
//!
//! Playback backends are pluggable through [`CuePlayer`]. A failing backend
//! never affects the timer: [`play_cue`] logs and drops the error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    Pause,
    WorkDone,
    BreakDone,
    Transition,
}

/// One beep of a cue pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    /// Offset from the start of the cue.
    pub delay_ms: u32,
}

const fn tone(frequency_hz: u32, duration_ms: u32, delay_ms: u32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        delay_ms,
    }
}

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        const START: [Tone; 1] = [tone(1000, 300, 0)];
        const PAUSE: [Tone; 1] = [tone(400, 300, 0)];
        const WORK_DONE: [Tone; 2] = [tone(700, 160, 0), tone(900, 160, 170)];
        const BREAK_DONE: [Tone; 2] = [tone(450, 160, 0), tone(350, 160, 170)];
        const TRANSITION: [Tone; 1] = [tone(850, 180, 0)];
        match self {
            Cue::Start => &START,
            Cue::Pause => &PAUSE,
            Cue::WorkDone => &WORK_DONE,
            Cue::BreakDone => &BREAK_DONE,
            Cue::Transition => &TRANSITION,
        }
    }

    /// Total time from the first tone's start to the last tone's end.
    pub fn span_ms(self) -> u32 {
        self.tones()
            .iter()
            .map(|t| t.delay_ms + t.duration_ms)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Error, Debug)]
pub enum CueError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

pub trait CuePlayer: Send {
    /// Play a cue at `volume` (0.0 ..= 1.0).
    fn play(&mut self, cue: Cue, volume: f64) -> Result<(), CueError>;
}

/// Silent backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCuePlayer;

impl CuePlayer for NullCuePlayer {
    fn play(&mut self, _cue: Cue, _volume: f64) -> Result<(), CueError> {
        Ok(())
    }
}

/// Play `cue` unless muted; backend errors are swallowed.
pub fn play_cue(player: &mut dyn CuePlayer, cue: Cue, settings: &Settings) {
    if !settings.audible() {
        return;
    }
    if let Err(e) = player.play(cue, settings.volume) {
        debug!(?cue, error = %e, "cue playback failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording(Vec<(Cue, f64)>);

    impl CuePlayer for Recording {
        fn play(&mut self, cue: Cue, volume: f64) -> Result<(), CueError> {
            self.0.push((cue, volume));
            Ok(())
        }
    }

    struct Broken;

    impl CuePlayer for Broken {
        fn play(&mut self, _cue: Cue, _volume: f64) -> Result<(), CueError> {
            Err(CueError::Unavailable("no device".into()))
        }
    }

    #[test]
    fn two_tone_patterns() {
        assert_eq!(Cue::WorkDone.tones().len(), 2);
        assert_eq!(Cue::WorkDone.tones()[1].frequency_hz, 900);
        assert_eq!(Cue::BreakDone.span_ms(), 330);
        assert_eq!(Cue::Start.span_ms(), 300);
    }

    #[test]
    fn muted_settings_play_nothing() {
        let mut player = Recording(Vec::new());
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        play_cue(&mut player, Cue::Start, &settings);
        assert!(player.0.is_empty());

        play_cue(&mut player, Cue::Start, &Settings::default());
        assert_eq!(player.0, vec![(Cue::Start, 0.6)]);
    }

    #[test]
    fn backend_errors_are_swallowed() {
        play_cue(&mut Broken, Cue::Transition, &Settings::default());
    }
}
