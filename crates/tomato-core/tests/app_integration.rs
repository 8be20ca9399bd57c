//! End-to-end behavior of `App`: event routing, persistence, backups.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tomato_core::app::{KEY_COMPLETED, KEY_STATS, KEY_TASKS, KEY_TIMER};
use tomato_core::cues::CueError;
use tomato_core::notify::NotifyError;
use tomato_core::storage::{MemorySettings, MemoryStore};
use tomato_core::{
    App, Collaborators, CoreError, Cue, CuePlayer, KvStore, ManualClock, Notification, Notifier,
    Phase, Settings, SettingsStore, TimerStatus,
};

#[derive(Clone, Default)]
struct CueLog(Arc<Mutex<Vec<Cue>>>);

impl CueLog {
    fn take(&self) -> Vec<Cue> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl CuePlayer for CueLog {
    fn play(&mut self, cue: Cue, _volume: f64) -> Result<(), CueError> {
        self.0.lock().unwrap().push(cue);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Inbox(Arc<Mutex<Vec<Notification>>>);

impl Notifier for Inbox {
    fn notify(&mut self, n: &Notification) -> Result<(), NotifyError> {
        self.0.lock().unwrap().push(n.clone());
        Ok(())
    }
}

struct Harness {
    clock: ManualClock,
    store: MemoryStore,
    settings: MemorySettings,
    cues: CueLog,
    inbox: Inbox,
}

impl Harness {
    fn new(settings: Settings) -> Self {
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let clock = ManualClock::at_day(day);
        clock.advance_min(9 * 60);
        Self {
            clock,
            store: MemoryStore::new(),
            settings: MemorySettings::with(settings),
            cues: CueLog::default(),
            inbox: Inbox::default(),
        }
    }

    fn app(&self) -> App {
        App::load(Collaborators {
            store: Box::new(self.store.clone()),
            settings_store: Box::new(self.settings.clone()),
            clock: Arc::new(self.clock.clone()),
            cues: Box::new(self.cues.clone()),
            notifier: Box::new(self.inbox.clone()),
        })
    }
}

fn manual() -> Settings {
    Settings {
        auto_start_breaks: false,
        auto_start_work: false,
        ..Settings::default()
    }
}

#[test]
fn cues_follow_timer_events() {
    let h = Harness::new(Settings::default());
    let mut app = h.app();

    app.start();
    assert_eq!(h.cues.take(), [Cue::Start]);
    h.clock.advance_min(1);
    app.pause();
    assert_eq!(h.cues.take(), [Cue::Pause]);

    app.skip();
    assert_eq!(h.cues.take(), [Cue::WorkDone, Cue::Transition, Cue::Start]);
    app.skip();
    assert_eq!(h.cues.take(), [Cue::BreakDone, Cue::Transition, Cue::Start]);
}

#[test]
fn muted_app_plays_nothing_but_still_counts() {
    let h = Harness::new(Settings {
        muted: true,
        ..manual()
    });
    let mut app = h.app();
    app.skip();
    assert!(h.cues.take().is_empty());
    assert_eq!(app.stats().total, 1);
}

#[test]
fn work_completion_records_stats_and_persists() {
    let h = Harness::new(manual());
    let mut app = h.app();
    app.start();
    h.clock.advance_min(25);
    app.tick();

    let summary = app.stats_summary();
    assert_eq!(summary.today, 1);
    assert_eq!(summary.total, 1);
    assert_eq!(summary.streak, 1);
    assert_eq!(app.stats().focus_minutes, 25);

    assert_eq!(h.store.get(KEY_COMPLETED).unwrap().as_deref(), Some("1"));
    assert!(h.store.get(KEY_STATS).unwrap().unwrap().contains("\"mins\":25"));
    assert!(h.store.get(KEY_TIMER).unwrap().unwrap().contains("\"short\""));
}

#[test]
fn notifications_only_when_enabled() {
    let h = Harness::new(manual());
    let mut app = h.app();
    app.skip();
    assert!(h.inbox.0.lock().unwrap().is_empty());

    app.set_setting("notifications", "true").unwrap();
    app.skip();
    let inbox = h.inbox.0.lock().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Focus time");
}

#[test]
fn state_survives_reload() {
    let h = Harness::new(manual());
    {
        let mut app = h.app();
        app.add_task("Write tests", 2).unwrap();
        app.skip();
        app.skip();
        app.start();
        h.clock.advance_min(10);
        app.save();
    }

    let app = h.app();
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.timer().completed_work_count(), 1);
    assert_eq!(app.timer().phase(), Phase::Work);
    assert_eq!(app.timer().status(), TimerStatus::Running);
    assert_eq!(app.timer().remaining_ms(), 15 * 60_000);
    assert!(app.timer().is_ticking());
}

#[test]
fn idle_phase_follows_settings_edited_between_runs() {
    let h = Harness::new(manual());
    h.app().save();

    let mut edited = h.settings.clone();
    edited
        .save(&Settings {
            work: 50,
            ..manual()
        })
        .unwrap();

    let app = h.app();
    assert_eq!(app.timer().status(), TimerStatus::Idle);
    assert_eq!(app.timer().remaining_ms(), 50 * 60_000);
}

#[test]
fn corrupted_phase_duration_is_replaced() {
    let h = Harness::new(manual());
    let mut raw = h.store.clone();
    raw.set(
        KEY_TIMER,
        r#"{"phase":"work","status":"idle","remaining_ms":10,"phase_duration_ms":18446744073709551615}"#,
    )
    .unwrap();

    let mut app = h.app();
    assert_eq!(app.timer().remaining_ms(), 25 * 60_000);
    app.skip();
    assert_eq!(app.stats().focus_minutes, 25);
}

#[test]
fn oversized_imported_counters_survive_completion() {
    let h = Harness::new(manual());
    let mut app = h.app();
    app.import_backup(
        r#"{"completedWorkSessions": 18446744073709551615,
            "stats": {"total": 18446744073709551615, "focusMinutes": 18446744073709551615}}"#,
    )
    .unwrap();
    let before = app.timer().completed_work_count();

    app.skip();
    assert_eq!(app.timer().completed_work_count(), before + 1);
    assert!(app.stats().total >= 1);
}

#[test]
fn unreadable_state_falls_back_to_defaults() {
    let h = Harness::new(manual());
    let mut raw = h.store.clone();
    raw.set(KEY_TASKS, "{not json").unwrap();
    raw.set(KEY_TIMER, "42").unwrap();
    raw.set(KEY_COMPLETED, "\"seven\"").unwrap();

    let app = h.app();
    assert!(app.tasks().is_empty());
    assert_eq!(app.timer().phase(), Phase::Work);
    assert_eq!(app.timer().status(), TimerStatus::Idle);
    assert_eq!(app.timer().completed_work_count(), 0);
}

#[test]
fn settings_change_waits_for_next_phase() {
    let h = Harness::new(manual());
    let mut app = h.app();
    app.start();
    h.clock.advance_min(5);
    app.set_setting("work", "50").unwrap();
    app.set_setting("short", "10").unwrap();
    assert_eq!(app.timer().remaining_ms(), 20 * 60_000);
    assert_eq!(h.settings.saved().unwrap().work, 50);

    app.skip();
    assert_eq!(app.timer().remaining_ms(), 10 * 60_000);
    app.skip();
    assert_eq!(app.timer().remaining_ms(), 50 * 60_000);
}

#[test]
fn bad_setting_is_rejected_without_change() {
    let h = Harness::new(manual());
    let mut app = h.app();
    assert!(app.set_setting("work", "soon").is_err());
    assert!(app.set_setting("unknown", "1").is_err());
    assert_eq!(app.settings(), &manual());
}

#[test]
fn task_operations_persist() {
    let h = Harness::new(manual());
    let mut app = h.app();
    let a = app.add_task("A", 1).unwrap().id;
    let b = app.add_task("B", 1).unwrap().id;
    app.add_task_spent(&a).unwrap();
    app.set_task_done(&b, true).unwrap();
    app.move_task(&b, 0).unwrap();
    assert_eq!(app.tasks().iter().next().unwrap().id, b);
    assert_eq!(app.clear_completed_tasks(), 1);
    assert!(matches!(app.remove_task("missing"), Err(CoreError::Validation(_))));

    let stored = h.store.get(KEY_TASKS).unwrap().unwrap();
    assert!(stored.contains("\"spent\":1"));
    assert!(!stored.contains("\"B\""));
}

#[test]
fn backup_roundtrip_between_apps() {
    let source = Harness::new(manual());
    let mut app = source.app();
    app.add_task("Carry me", 3).unwrap();
    app.skip();
    app.set_setting("long_every", "3").unwrap();
    let json = app.export_backup().to_json().unwrap();

    let target = Harness::new(Settings::default());
    let mut other = target.app();
    let import = other.import_backup(&json).unwrap();
    assert!(!import.is_empty());
    assert_eq!(other.tasks().len(), 1);
    assert_eq!(other.stats().total, 1);
    assert_eq!(other.timer().completed_work_count(), 1);
    assert_eq!(other.settings().long_every, 3);
    assert!(!other.settings().auto_start_work);
}

#[test]
fn malformed_import_changes_nothing() {
    let h = Harness::new(manual());
    let mut app = h.app();
    app.add_task("Keep", 1).unwrap();
    let before = app.export_backup();

    let err = app
        .import_backup(r#"{"tasks": [], "stats": {"total": "many"}}"#)
        .unwrap_err();
    assert!(matches!(err, CoreError::Import(_)));
    assert_eq!(app.export_backup(), before);
}

#[test]
fn reset_stats_clears_counter() {
    let h = Harness::new(manual());
    let mut app = h.app();
    app.skip();
    app.reset_stats();
    assert_eq!(app.timer().completed_work_count(), 0);
    assert_eq!(app.stats().total, 0);
    assert_eq!(h.store.get(KEY_COMPLETED).unwrap().as_deref(), Some("0"));
}

#[test]
fn toggle_and_title() {
    let h = Harness::new(manual());
    let mut app = h.app();
    assert_eq!(app.title_line(), "🍅 25:00 • paused — Tomato Pomodoro");
    app.toggle();
    h.clock.advance_secs(61);
    assert_eq!(app.title_line(), "🍅 23:59 — Tomato Pomodoro");
    app.toggle();
    assert_eq!(app.timer().status(), TimerStatus::Paused);
}
