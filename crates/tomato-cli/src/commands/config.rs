use clap::Subcommand;
use tomato_core::{Settings, SettingsFile, SettingsStore};

use super::open_app;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting (e.g. "work", "longEvery", "auto_start_breaks")
    Get {
        /// Setting key
        key: String,
    },
    /// Set a setting; numbers are clamped to their allowed range
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Print the settings file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = SettingsFile::default_location()?.load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    return Err(format!(
                        "unknown key: {key} (known: {})",
                        Settings::keys().join(", ")
                    )
                    .into());
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut app = open_app()?;
            app.set_setting(&key, &value)?;
            println!("{key} = {}", app.settings().get(&key).unwrap_or_default());
        }
        ConfigAction::List => {
            let settings = SettingsFile::default_location()?.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            let mut app = open_app()?;
            app.update_settings(Settings::default())?;
            println!("settings reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", SettingsFile::default_location()?.path().display());
        }
    }
    Ok(())
}
