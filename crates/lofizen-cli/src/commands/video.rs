use clap::Subcommand;
use lofizen_core::storage::Database;
use lofizen_core::Playlist;

#[derive(Subcommand)]
pub enum VideoAction {
    /// List channels as JSON
    List,
    /// Add a channel to the playlist
    Add {
        /// Channel title (at least 3 characters)
        title: String,
        /// YouTube video URL
        url: String,
    },
    /// Remove a channel by URL
    Remove {
        /// Channel URL
        url: String,
    },
    /// Select the currently playing channel
    Select {
        /// Channel URL
        url: String,
    },
}

const CURRENT_KEY: &str = "current_channel";

pub fn run(action: VideoAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut playlist = Playlist::default();
    playlist.load(&db)?;
    if let Ok(Some(url)) = db.kv_get(CURRENT_KEY) {
        let _ = playlist.select(&url); // stale selection falls back to head
    }

    match action {
        VideoAction::List => {
            println!("{}", serde_json::to_string_pretty(playlist.videos())?);
        }
        VideoAction::Add { title, url } => {
            let item = playlist.add(&db, &title, &url)?;
            // First add replaces the built-in defaults in the store.
            playlist.save_all(&db)?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        VideoAction::Remove { url } => {
            playlist.remove(&db, &url)?;
            println!("removed {url}");
        }
        VideoAction::Select { url } => {
            let item = playlist.select(&url)?;
            db.kv_set(CURRENT_KEY, &item.url)?;
            println!("{}", serde_json::to_string_pretty(item)?);
        }
    }
    Ok(())
}
