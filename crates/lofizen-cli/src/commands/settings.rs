use clap::Subcommand;
use lofizen_core::storage::Database;
use lofizen_core::{PomodoroDurations, Settings};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings as JSON
    Show,
    /// Set the daily focus goal
    SetGoal {
        /// Goal in minutes per day
        minutes: u64,
    },
    /// Set pomodoro interval lengths
    SetPomodoro {
        /// Focus interval in minutes
        #[arg(long)]
        focus: u64,
        /// Break interval in minutes
        #[arg(long = "break")]
        break_min: u64,
    },
    /// Set player volume (0-100)
    SetVolume {
        volume: u32,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut settings = Settings::load(&db)?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
        SettingsAction::SetGoal { minutes } => {
            settings.set_daily_goal(minutes * 60 * 1000)?;
        }
        SettingsAction::SetPomodoro { focus, break_min } => {
            settings.set_pomodoro(PomodoroDurations {
                focus_ms: focus * 60 * 1000,
                break_ms: break_min * 60 * 1000,
            })?;
        }
        SettingsAction::SetVolume { volume } => {
            settings.set_volume(volume)?;
        }
    }

    settings.save(&db)?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
