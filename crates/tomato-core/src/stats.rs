//! Completed work sessions and the aggregates derived from them.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub day: NaiveDate,
    #[serde(rename = "mins")]
    pub minutes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub sessions: Vec<SessionEntry>,
    pub total: u64,
    pub focus_minutes: u64,
    /// Consecutive days with at least one completed work phase.
    pub streak: u64,
    #[serde(with = "optional_day")]
    pub last_day: Option<NaiveDate>,
}

/// Aggregates shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub today: u64,
    /// Last seven days, today included.
    pub week: u64,
    /// Since the first of the current month.
    pub month: u64,
    pub total: u64,
    pub focus_hours: f64,
    pub streak: u64,
}

impl Stats {
    /// Record one completed work phase of `minutes` on `day`.
    pub fn record(&mut self, day: NaiveDate, minutes: u64) {
        self.sessions.push(SessionEntry { day, minutes });
        self.total = self.total.saturating_add(1);
        self.focus_minutes = self.focus_minutes.saturating_add(minutes);
        self.streak = match self.last_day {
            None => 1,
            Some(last) => match (day - last).num_days() {
                0 => self.streak.max(1),
                1 => self.streak.saturating_add(1),
                _ => 1,
            },
        };
        self.last_day = Some(day);
    }

    /// Cap the counters at `max`, for data that came from outside.
    pub fn bounded(mut self, max: u64) -> Self {
        self.total = self.total.min(max);
        self.focus_minutes = self.focus_minutes.min(max);
        self.streak = self.streak.min(max);
        self
    }

    pub fn summary(&self, today: NaiveDate) -> StatsSummary {
        let week_start = today - Duration::days(6);
        let month_start = today.with_day(1).unwrap_or(today);
        let count_since = |from: NaiveDate| {
            self.sessions.iter().filter(|s| s.day >= from).count() as u64
        };
        StatsSummary {
            today: self.sessions.iter().filter(|s| s.day == today).count() as u64,
            week: count_since(week_start),
            month: count_since(month_start),
            total: self.total,
            focus_hours: self.focus_minutes as f64 / 60.0,
            streak: self.streak,
        }
    }
}

/// `lastDay` is stored as `""` when no session was ever recorded.
mod optional_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match day {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn record_accumulates_totals() {
        let mut stats = Stats::default();
        stats.record(day(2024, 5, 1), 25);
        stats.record(day(2024, 5, 1), 50);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.focus_minutes, 75);
        assert_eq!(stats.sessions.len(), 2);
        assert_eq!(stats.last_day, Some(day(2024, 5, 1)));
    }

    #[test]
    fn streak_rules() {
        let mut stats = Stats::default();
        stats.record(day(2024, 5, 1), 25);
        assert_eq!(stats.streak, 1);
        stats.record(day(2024, 5, 1), 25);
        assert_eq!(stats.streak, 1);
        stats.record(day(2024, 5, 2), 25);
        assert_eq!(stats.streak, 2);
        stats.record(day(2024, 5, 3), 25);
        assert_eq!(stats.streak, 3);
        stats.record(day(2024, 5, 6), 25);
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn record_saturates_counters() {
        let mut stats = Stats {
            total: u64::MAX,
            focus_minutes: u64::MAX - 5,
            ..Stats::default()
        };
        stats.record(day(2024, 5, 1), 25);
        assert_eq!(stats.total, u64::MAX);
        assert_eq!(stats.focus_minutes, u64::MAX);
    }

    #[test]
    fn summary_windows() {
        let mut stats = Stats::default();
        stats.record(day(2024, 4, 28), 25);
        stats.record(day(2024, 5, 1), 25);
        stats.record(day(2024, 5, 3), 25);
        stats.record(day(2024, 5, 4), 25);
        stats.record(day(2024, 5, 4), 25);

        let summary = stats.summary(day(2024, 5, 4));
        assert_eq!(summary.today, 2);
        assert_eq!(summary.week, 5);
        assert_eq!(summary.month, 4);
        assert_eq!(summary.total, 5);
        assert!((summary.focus_hours - 125.0 / 60.0).abs() < 1e-9);

        let later = stats.summary(day(2024, 5, 8));
        assert_eq!(later.today, 0);
        assert_eq!(later.week, 3);
    }

    #[test]
    fn serialized_layout_uses_stored_names() {
        let mut stats = Stats::default();
        stats.record(day(2024, 5, 1), 25);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["sessions"][0]["day"], "2024-05-01");
        assert_eq!(json["sessions"][0]["mins"], 25);
        assert_eq!(json["focusMinutes"], 25);
        assert_eq!(json["lastDay"], "2024-05-01");
    }

    #[test]
    fn empty_last_day_parses_as_none() {
        let stats: Stats = serde_json::from_str(
            r#"{"sessions":[],"total":0,"focusMinutes":0,"streak":0,"lastDay":""}"#,
        )
        .unwrap();
        assert_eq!(stats.last_day, None);
        assert_eq!(serde_json::to_value(&stats).unwrap()["lastDay"], "");
    }
}
