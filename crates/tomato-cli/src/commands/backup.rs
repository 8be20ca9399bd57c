use std::path::PathBuf;

use clap::Subcommand;
use tomato_core::backup::BACKUP_FILE_NAME;

use super::open_app;

#[derive(Subcommand)]
pub enum BackupAction {
    /// Write settings, tasks and statistics to a JSON file
    Export {
        /// Output file; "-" for stdout
        #[arg(long, default_value = BACKUP_FILE_NAME)]
        output: PathBuf,
    },
    /// Restore from a JSON backup; malformed files change nothing
    Import {
        /// Backup file
        path: PathBuf,
    },
}

pub fn run(action: BackupAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        BackupAction::Export { output } => {
            let json = app.export_backup().to_json()?;
            if output.as_os_str() == "-" {
                println!("{json}");
            } else {
                std::fs::write(&output, json)?;
                eprintln!("backup written to {}", output.display());
            }
        }
        BackupAction::Import { path } => {
            let text = std::fs::read_to_string(&path)?;
            app.import_backup(&text)?;
            println!("Import successful");
        }
    }
    Ok(())
}
