use std::io::Write;
use std::time::Duration;

use clap::Args;
use tomato_core::display::{format_clock, progress_bar};
use tomato_core::{App, Event};

use super::open_app;

#[derive(Args)]
pub struct RunArgs {
    /// Redraw cadence in milliseconds
    #[arg(long, default_value = "250")]
    interval_ms: u64,
    /// Stop after this many phase completions
    #[arg(long)]
    phases: Option<u32>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(args))
}

async fn drive(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;
    for event in app.start() {
        announce(&app, &event);
    }

    let mut interval = tokio::time::interval(Duration::from_millis(args.interval_ms.max(10)));
    let mut completed = 0u32;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for event in app.tick() {
                    match event {
                        Event::TickUpdated { remaining_ms, progress_ratio } => {
                            render(&app, remaining_ms, progress_ratio);
                        }
                        Event::WorkPhaseCompleted { .. } | Event::BreakCompleted { .. } => {
                            completed += 1;
                            announce(&app, &event);
                        }
                        other => announce(&app, &other),
                    }
                }
                if args.phases.is_some_and(|limit| completed >= limit) {
                    app.pause();
                    break;
                }
                if !app.timer().is_ticking() {
                    // Phase ended without auto-start; nothing left to drive.
                    break;
                }
            }
            _ = &mut ctrl_c => {
                app.pause();
                break;
            }
        }
    }

    println!();
    app.save();
    println!("{}", app.title_line());
    Ok(())
}

fn render(app: &App, remaining_ms: u64, progress_ratio: f64) {
    let mut out = std::io::stdout();
    let _ = write!(
        out,
        "\r{} {:<12} {} {}",
        app.timer().phase().glyph(),
        app.timer().phase().label(),
        format_clock(remaining_ms),
        progress_bar(progress_ratio, 30)
    );
    let _ = out.flush();
}

fn announce(app: &App, event: &Event) {
    match event {
        Event::Started { phase, remaining_ms, .. } => {
            println!("\n▶ {} ({})", phase.label(), format_clock(*remaining_ms));
        }
        Event::Paused { remaining_ms, .. } => {
            println!("\n⏸ paused at {}", format_clock(*remaining_ms));
        }
        Event::WorkPhaseCompleted { minutes, completed_work_count, .. } => {
            println!(
                "\n✔ {minutes} min of work done ({completed_work_count} total, {} today)",
                app.stats_summary().today
            );
        }
        Event::BreakCompleted { phase, .. } => println!("\n✔ {} over", phase.label()),
        Event::PhaseChanged { phase, duration_ms, .. } => {
            println!("→ {} ({})", phase.label(), format_clock(*duration_ms));
        }
        Event::TickUpdated { .. }
        | Event::PhaseCompletionNotified { .. }
        | Event::StateSnapshot { .. } => {}
    }
}
