use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lofizen", version, about = "Lofizen focus companion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Usage statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Session history
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Task list
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Ambient video playlist
    Video {
        #[command(subcommand)]
        action: commands::video::VideoAction,
    },
    /// Settings (daily goal, pomodoro durations, volume)
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Clear stored data
    Clear {
        #[command(subcommand)]
        action: commands::clear::ClearAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Video { action } => commands::video::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Clear { action } => commands::clear::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
