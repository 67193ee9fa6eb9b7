//! Ambient video playlist over the `video` partition.
//!
//! The embedded player itself is a presentation collaborator; the core
//! only manages the channel list, the current selection, and URL
//! validation at the boundary.

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::storage::{Database, Partition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub title: String,
    pub url: String,
}

/// Built-in lofi channels seeded on first run.
pub fn default_channels() -> Vec<VideoItem> {
    vec![
        VideoItem {
            title: "lofi hip hop radio - beats to relax/study to".into(),
            url: "https://www.youtube.com/watch?v=jfKfPfyJRdk".into(),
        },
        VideoItem {
            title: "synthwave radio - beats to chill/game to".into(),
            url: "https://www.youtube.com/watch?v=4xDzrJKXOOY".into(),
        },
        VideoItem {
            title: "jazz lofi radio - beats to chill/study to".into(),
            url: "https://www.youtube.com/watch?v=HuFYqnbVbzY".into(),
        },
    ]
}

const YOUTUBE_HOSTS: [&str; 4] = ["youtube.com", "www.youtube.com", "m.youtube.com", "youtu.be"];

/// Validate a channel entry before it enters the list.
///
/// YouTube Music URLs are rejected explicitly: the embedded player
/// handles them in unexpected ways.
pub fn validate_video(title: &str, url: &str) -> Result<(), ValidationError> {
    if title.trim().len() < 3 {
        return Err(ValidationError::invalid(
            "title",
            "enter at least 3 characters",
        ));
    }
    let parsed = Url::parse(url)
        .map_err(|e| ValidationError::invalid("url", format!("invalid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::invalid("url", "must be http(s)"));
    }
    let host = parsed.host_str().unwrap_or("");
    if host == "music.youtube.com" {
        return Err(ValidationError::invalid(
            "url",
            "YouTube Music URLs are not supported; use a regular YouTube video URL",
        ));
    }
    if !YOUTUBE_HOSTS.contains(&host) {
        return Err(ValidationError::invalid(
            "url",
            "must be a YouTube video URL",
        ));
    }
    Ok(())
}

/// Channel list plus the currently selected channel.
#[derive(Debug)]
pub struct Playlist {
    videos: Vec<VideoItem>,
    current_url: String,
}

impl Default for Playlist {
    fn default() -> Self {
        let videos = default_channels();
        let current_url = videos[0].url.clone();
        Self {
            videos,
            current_url,
        }
    }
}

impl Playlist {
    pub fn videos(&self) -> &[VideoItem] {
        &self.videos
    }

    pub fn current(&self) -> &VideoItem {
        self.videos
            .iter()
            .find(|v| v.url == self.current_url)
            .unwrap_or(&self.videos[0])
    }

    /// Seed from the store; an empty partition keeps the defaults.
    pub fn load(&mut self, db: &Database) -> Result<(), StorageError> {
        let stored: Vec<VideoItem> = db.get_all(Partition::Video)?;
        if !stored.is_empty() {
            self.videos = stored;
            if !self.videos.iter().any(|v| v.url == self.current_url) {
                self.current_url = self.videos[0].url.clone();
            }
        }
        Ok(())
    }

    pub fn add(&mut self, db: &Database, title: &str, url: &str) -> Result<VideoItem> {
        validate_video(title, url)?;
        if self.videos.iter().any(|v| v.url == url) {
            return Err(ValidationError::invalid("url", "already in the playlist").into());
        }
        let item = VideoItem {
            title: title.trim().to_string(),
            url: url.to_string(),
        };
        if let Err(err) = db.put(Partition::Video, &item.url, &item) {
            warn!(url = %item.url, %err, "video not persisted; keeping in-memory only");
        }
        self.videos.push(item.clone());
        Ok(item)
    }

    pub fn remove(&mut self, db: &Database, url: &str) -> Result<()> {
        let before = self.videos.len();
        self.videos.retain(|v| v.url != url);
        if self.videos.len() == before {
            return Err(CoreError::NotFound {
                kind: "video",
                id: url.to_string(),
            });
        }
        if self.videos.is_empty() {
            self.videos = default_channels();
        }
        if self.current_url == url {
            self.current_url = self.videos[0].url.clone();
        }
        db.delete(Partition::Video, url)?;
        Ok(())
    }

    /// Select the currently playing channel.
    pub fn select(&mut self, url: &str) -> Result<&VideoItem> {
        if !self.videos.iter().any(|v| v.url == url) {
            return Err(CoreError::NotFound {
                kind: "video",
                id: url.to_string(),
            });
        }
        self.current_url = url.to_string();
        Ok(self.current())
    }

    pub fn reset(&mut self, db: &Database) -> Result<(), StorageError> {
        *self = Self::default();
        db.clear(Partition::Video)
    }

    /// Persist the whole list (used after edits that replace entries).
    pub fn save_all(&self, db: &Database) -> Result<(), StorageError> {
        db.clear(Partition::Video)?;
        for v in &self.videos {
            db.put(Partition::Video, &v.url, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_present() {
        let playlist = Playlist::default();
        assert!(!playlist.videos().is_empty());
        assert_eq!(playlist.current().url, playlist.videos()[0].url);
    }

    #[test]
    fn rejects_non_youtube_and_music_urls() {
        assert!(validate_video("ok title", "https://vimeo.com/123").is_err());
        assert!(validate_video("ok title", "not a url").is_err());
        assert!(validate_video("ok title", "ftp://youtube.com/watch?v=x").is_err());
        let err = validate_video("ok title", "https://music.youtube.com/watch?v=x").unwrap_err();
        assert!(err.to_string().contains("YouTube Music"));
    }

    #[test]
    fn short_title_rejected() {
        assert!(validate_video("ab", "https://youtu.be/jfKfPfyJRdk").is_err());
    }

    #[test]
    fn add_select_remove() {
        let db = Database::open_memory().unwrap();
        let mut playlist = Playlist::default();
        let added = playlist
            .add(&db, "deep focus", "https://youtu.be/abc123xyz")
            .unwrap();
        playlist.select(&added.url).unwrap();
        assert_eq!(playlist.current().title, "deep focus");

        playlist.remove(&db, &added.url).unwrap();
        // Selection falls back to the head of the list.
        assert_eq!(playlist.current().url, playlist.videos()[0].url);
    }

    #[test]
    fn duplicate_url_rejected() {
        let db = Database::open_memory().unwrap();
        let mut playlist = Playlist::default();
        playlist
            .add(&db, "one", "https://youtu.be/abc123xyz")
            .unwrap();
        assert!(playlist
            .add(&db, "two", "https://youtu.be/abc123xyz")
            .is_err());
    }

    #[test]
    fn stored_list_overrides_defaults() {
        let db = Database::open_memory().unwrap();
        let mut playlist = Playlist::default();
        playlist
            .add(&db, "mine", "https://www.youtube.com/watch?v=zzz")
            .unwrap();
        playlist.save_all(&db).unwrap();

        let mut reloaded = Playlist::default();
        reloaded.load(&db).unwrap();
        assert_eq!(reloaded.videos().len(), playlist.videos().len());
        assert!(reloaded.videos().iter().any(|v| v.title == "mine"));
    }
}
