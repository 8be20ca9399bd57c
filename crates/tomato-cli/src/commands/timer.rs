use clap::Subcommand;
use serde_json::json;
use tomato_core::{App, Event};

use super::open_app;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    /// Back to the start of the current phase
    Reset,
    /// Complete the current phase now
    Skip,
    /// Print current timer state as JSON
    Status,
}

/// Print the events of one command plus the resulting state.
fn report(app: &App, events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    let out = json!({
        "events": events,
        "state": app.timer().snapshot(),
        "title": app.title_line(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    // Catch up on anything that expired since the last invocation.
    let mut events = app.tick();
    events.retain(|e| !matches!(e, Event::TickUpdated { .. }));

    events.extend(match action {
        TimerAction::Start => app.start(),
        TimerAction::Pause => app.pause(),
        TimerAction::Toggle => app.toggle(),
        TimerAction::Reset => app.reset(),
        TimerAction::Skip => app.skip(),
        TimerAction::Status => Vec::new(),
    });

    report(&app, &events)?;
    app.save();
    Ok(())
}
