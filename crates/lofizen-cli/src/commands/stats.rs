use chrono::Local;
use clap::Subcommand;
use lofizen_core::storage::Database;
use lofizen_core::{compute_stats, daily_goal_progress, format, SessionRecorder, Settings};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full aggregate stats as JSON
    Show,
    /// Today's progress toward the daily goal
    Goal,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let settings = Settings::load(&db)?;
    let mut recorder = SessionRecorder::new();
    recorder.load(&db)?;

    let today = Local::now().date_naive();
    let stats = compute_stats(recorder.history(), &settings.pomodoro, today);

    match action {
        StatsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Goal => {
            let pct = daily_goal_progress(&stats, settings.daily_goal_ms);
            println!(
                "{} of {} today ({pct}%)",
                format::format_duration(stats.todays_time_ms),
                format::format_duration(settings.daily_goal_ms),
            );
        }
    }
    Ok(())
}
