use clap::Subcommand;

use super::open_app;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today, week, month, total, focus hours and streak
    Summary,
    /// Every recorded work session
    Sessions,
    /// Forget all statistics and the completed work counter
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        StatsAction::Summary => {
            let summary = app.stats_summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Sessions => {
            println!("{}", serde_json::to_string_pretty(&app.stats().sessions)?);
        }
        StatsAction::Reset => {
            app.reset_stats();
            println!("statistics cleared");
        }
    }
    Ok(())
}
