use clap::Subcommand;
use lofizen_core::storage::{Database, Partition};

#[derive(Subcommand)]
pub enum ClearAction {
    /// Clear session history (stats)
    Stats,
    /// Clear the task list
    Todos,
    /// Clear the video playlist
    Videos,
    /// Reset settings to defaults
    Settings,
    /// Clear everything, partition by partition
    Everything,
}

pub fn run(action: ClearAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    let partitions: &[Partition] = match action {
        ClearAction::Stats => &[Partition::Session],
        ClearAction::Todos => &[Partition::Todo],
        ClearAction::Videos => &[Partition::Video],
        ClearAction::Settings => &[Partition::Settings],
        ClearAction::Everything => &Partition::ALL,
    };

    for partition in partitions {
        db.clear(*partition)?;
        println!("cleared {partition}");
    }
    Ok(())
}
