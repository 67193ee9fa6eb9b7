mod database;

pub use database::Database;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Named partitions of the store. A closed enumeration so a typo'd
/// partition name is a compile error, not a silent empty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Session,
    Todo,
    Video,
    Settings,
}

impl Partition {
    pub const ALL: [Partition; 4] = [
        Partition::Session,
        Partition::Todo,
        Partition::Video,
        Partition::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Session => "session",
            Partition::Todo => "todo",
            Partition::Video => "video",
            Partition::Settings => "settings",
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Partition {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Partition::Session),
            "todo" => Ok(Partition::Todo),
            "video" => Ok(Partition::Video),
            "settings" => Ok(Partition::Settings),
            other => Err(crate::error::ValidationError::invalid(
                "partition",
                format!("unknown partition '{other}'"),
            )),
        }
    }
}

/// Returns `~/.config/lofizen[-dev]/` based on LOFIZEN_ENV.
///
/// Set LOFIZEN_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LOFIZEN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("lofizen-dev")
    } else {
        base_dir.join("lofizen")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
