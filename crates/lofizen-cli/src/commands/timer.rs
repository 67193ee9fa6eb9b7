use clap::Subcommand;
use lofizen_core::storage::Database;
use lofizen_core::{Settings, SessionRecorder, TimerEngine};

/// The live engine survives between CLI invocations as a JSON snapshot
/// in the kv store; every command flushes it from the wall clock first.
const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a stopwatch run
    Stopwatch,
    /// Start a countdown run
    Countdown {
        /// Countdown length in minutes
        #[arg(long)]
        minutes: u64,
    },
    /// Start a pomodoro run (intervals from settings)
    Pomodoro,
    /// Pause the running timer
    Pause,
    /// Resume a paused timer
    Resume,
    /// Stop and record the current run
    Stop,
    /// Discard the current run without recording
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn load_engine(db: &Database) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
    }
    TimerEngine::new()
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Catch the engine up with the wall clock, recording a countdown that
/// completed while no process was running.
fn catch_up(db: &Database, engine: &mut TimerEngine) {
    let result = engine.tick();
    if let Some(run) = result.finished {
        let mut recorder = SessionRecorder::new();
        if let Err(e) = recorder.load(db) {
            eprintln!("warning: could not load history: {e}");
        }
        let record = recorder.record(db, run);
        eprintln!("countdown completed; session {} recorded", record.id);
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut engine = load_engine(&db);
    catch_up(&db, &mut engine);

    match action {
        TimerAction::Stopwatch => {
            let event = engine.start_stopwatch()?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Countdown { minutes } => {
            let event = engine.start_countdown(minutes * 60 * 1000)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Pomodoro => {
            let settings = Settings::load(&db)?;
            let event = engine.start_pomodoro(settings.pomodoro)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Pause => {
            let event = engine.pause()?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Resume => {
            let event = engine.resume()?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Stop => {
            match engine.stop()? {
                Some(run) => {
                    let mut recorder = SessionRecorder::new();
                    recorder.load(&db)?;
                    let record = recorder.record(&db, run);
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                None => println!("run too short, nothing recorded"),
            }
        }
        TimerAction::Reset => {
            engine.reset();
            println!("{{\"type\": \"TimerReset\"}}");
        }
        TimerAction::Status => {
            let snapshot = engine.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
