use clap::Subcommand;
use lofizen_core::storage::Database;
use lofizen_core::SessionRecorder;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum SessionAction {
    /// List recorded sessions as JSON
    List,
    /// Delete one session by id
    Delete {
        /// Session id
        id: Uuid,
    },
    /// Delete the entire history
    Clear,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut recorder = SessionRecorder::new();
    recorder.load(&db)?;

    match action {
        SessionAction::List => {
            println!("{}", serde_json::to_string_pretty(recorder.history())?);
        }
        SessionAction::Delete { id } => {
            recorder.delete(&db, id)?;
            println!("deleted {id}");
        }
        SessionAction::Clear => {
            let n = recorder.len();
            recorder.clear(&db)?;
            println!("cleared {n} sessions");
        }
    }
    Ok(())
}
