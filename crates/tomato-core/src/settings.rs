//! User settings: durations, auto-start flags, sound and notification
//! preferences.
//!
//! Field names serialize in camelCase so settings files and backups share
//! one layout. Every value passes through [`Settings::clamped`] before it
//! reaches the timer.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::timer::{TimerConfig, MAX_PHASE_MINUTES};

pub const WORK_RANGE: (u64, u64) = (5, MAX_PHASE_MINUTES);
pub const SHORT_RANGE: (u64, u64) = (3, 30);
pub const LONG_RANGE: (u64, u64) = (10, 60);
pub const LONG_EVERY_RANGE: (u64, u64) = (2, 8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Work phase length in minutes.
    pub work: u64,
    /// Short break length in minutes.
    pub short: u64,
    /// Long break length in minutes.
    pub long: u64,
    pub long_every: u64,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
    pub dark: bool,
    /// 0.0 ..= 1.0
    pub volume: f64,
    pub muted: bool,
    /// Desktop notifications on phase change.
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work: 25,
            short: 5,
            long: 15,
            long_every: 4,
            auto_start_breaks: true,
            auto_start_work: true,
            dark: true,
            volume: 0.6,
            muted: false,
            notifications: false,
        }
    }
}

impl Settings {
    /// Force every value into its accepted range.
    pub fn clamped(mut self) -> Self {
        self.work = clamp(self.work, WORK_RANGE);
        self.short = clamp(self.short, SHORT_RANGE);
        self.long = clamp(self.long, LONG_RANGE);
        self.long_every = clamp(self.long_every, LONG_EVERY_RANGE);
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Settings::default().volume
        };
        self
    }

    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            work_min: self.work,
            short_min: self.short,
            long_min: self.long,
            long_every: self.long_every,
            auto_start_breaks: self.auto_start_breaks,
            auto_start_work: self.auto_start_work,
        }
    }

    /// Whether cues should make any sound at all.
    pub fn audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }

    /// Get a value as string by key (`longEvery` or `long_every`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = json.get(canonical_key(key))?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by key, parsing it according to the current value's type.
    ///
    /// The result is clamped; out-of-range numbers are accepted and pulled
    /// into range rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let canonical = canonical_key(key);
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(&canonical)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(n) if n.is_f64() => {
                let parsed = value
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Number::from_f64(parsed)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
            }
            serde_json::Value::Number(_) => {
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as whole number")))?;
                serde_json::Value::Number(parsed.into())
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(canonical, new_value);
        *self = serde_json::from_value::<Settings>(json)?.clamped();
        Ok(())
    }

    /// Recognized keys in serialized form.
    pub fn keys() -> Vec<String> {
        match serde_json::to_value(Settings::default()) {
            Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

fn clamp(value: u64, (min, max): (u64, u64)) -> u64 {
    value.clamp(min, max)
}

/// Accept snake_case spellings of the camelCase keys.
fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
