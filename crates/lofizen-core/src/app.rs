//! Application state: one struct owning every mutable piece.
//!
//! The original kept these as process-wide reactive atoms; here they
//! are explicit fields passed by reference, and statistics are
//! recomputed by an explicit call whenever the history changes rather
//! than by a framework re-render.

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::events::Event;
use crate::playlist::{Playlist, VideoItem};
use crate::session::{SessionRecord, SessionRecorder};
use crate::settings::Settings;
use crate::stats::{compute_stats, UserStats};
use crate::storage::{Database, Partition};
use crate::timer::{FinishedRun, PomodoroDurations, TimerEngine};
use crate::todo::{TodoItem, TodoList};

pub struct App {
    db: Database,
    engine: TimerEngine,
    recorder: SessionRecorder,
    todos: TodoList,
    playlist: Playlist,
    settings: Settings,
    stats: UserStats,
}

impl App {
    /// Build the application state, seeding everything from the store.
    ///
    /// Read failures degrade to empty in-memory state rather than
    /// failing startup: losing durability must never break a session.
    pub fn new(db: Database) -> Self {
        let mut recorder = SessionRecorder::new();
        if let Err(err) = recorder.load(&db) {
            warn!(%err, "could not load session history; starting empty");
        }
        let mut todos = TodoList::new();
        if let Err(err) = todos.load(&db) {
            warn!(%err, "could not load todos; starting empty");
        }
        let mut playlist = Playlist::default();
        if let Err(err) = playlist.load(&db) {
            warn!(%err, "could not load playlist; using defaults");
        }
        let settings = match Settings::load(&db) {
            Ok(s) => s,
            Err(err) => {
                warn!(%err, "could not load settings; using defaults");
                Settings::default()
            }
        };

        let stats = compute_stats(recorder.history(), &settings.pomodoro, today());
        Self {
            db,
            engine: TimerEngine::new(),
            recorder,
            todos,
            playlist,
            settings,
            stats,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn history(&self) -> &[SessionRecord] {
        self.recorder.history()
    }

    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Timer flow ───────────────────────────────────────────────────

    pub fn start_stopwatch(&mut self) -> Result<Event> {
        self.engine.start_stopwatch()
    }

    pub fn start_countdown(&mut self, target_ms: u64) -> Result<Event> {
        self.engine.start_countdown(target_ms)
    }

    pub fn start_pomodoro(&mut self) -> Result<Event> {
        self.engine.start_pomodoro(self.settings.pomodoro)
    }

    pub fn pause(&mut self) -> Result<Event> {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> Result<Event> {
        self.engine.resume()
    }

    pub fn reset(&mut self) -> Event {
        self.engine.reset()
    }

    /// Advance the timer; records and recomputes when a countdown run
    /// completed during this tick.
    pub fn tick(&mut self) -> Vec<Event> {
        let result = self.engine.tick();
        let mut events = result.events;
        if let Some(run) = result.finished {
            events.extend(self.record_run(run));
        }
        events
    }

    /// Stop the active run, recording it unless it was too short.
    pub fn stop(&mut self) -> Result<Vec<Event>> {
        let run = self.engine.stop()?;
        Ok(match run {
            Some(run) => self.record_run(run),
            None => {
                debug!("run below recordable threshold; discarded");
                Vec::new()
            }
        })
    }

    fn record_run(&mut self, run: FinishedRun) -> Vec<Event> {
        let record = self.recorder.record(&self.db, run);
        let mut events = vec![Event::SessionRecorded {
            id: record.id,
            at: Utc::now(),
        }];
        events.push(self.recompute_stats());
        events
    }

    /// Recompute aggregates from the current history. Explicit, not
    /// reactive: call after any history change.
    pub fn recompute_stats(&mut self) -> Event {
        self.recompute_stats_for(today())
    }

    pub fn recompute_stats_for(&mut self, today: NaiveDate) -> Event {
        self.stats = compute_stats(self.recorder.history(), &self.settings.pomodoro, today);
        Event::StatsRecomputed {
            stats: self.stats.clone(),
            at: Utc::now(),
        }
    }

    // ── History management ───────────────────────────────────────────

    pub fn delete_session(&mut self, id: Uuid) -> Result<Event> {
        self.recorder.delete(&self.db, id)?;
        Ok(self.recompute_stats())
    }

    /// User-triggered data wipe for one partition.
    pub fn clear_partition(&mut self, partition: Partition) -> Result<Event> {
        match partition {
            Partition::Session => self.recorder.clear(&self.db)?,
            Partition::Todo => self.todos.clear(&self.db)?,
            Partition::Video => self.playlist.reset(&self.db)?,
            Partition::Settings => {
                self.settings = Settings::default();
                self.db.clear(Partition::Settings)?;
            }
        }
        Ok(self.recompute_stats())
    }

    /// Clear everything, partition by partition.
    pub fn clear_all(&mut self) -> Result<Event> {
        for partition in Partition::ALL {
            self.clear_partition(partition)?;
        }
        Ok(self.recompute_stats())
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn set_daily_goal(&mut self, ms: u64) -> Result<()> {
        self.settings.set_daily_goal(ms)?;
        self.persist_settings();
        Ok(())
    }

    pub fn set_pomodoro(&mut self, durations: PomodoroDurations) -> Result<()> {
        self.settings.set_pomodoro(durations)?;
        self.persist_settings();
        // Interval lengths feed the focus/break contribution rule.
        self.recompute_stats();
        Ok(())
    }

    pub fn set_volume(&mut self, volume: u32) -> Result<()> {
        self.settings.set_volume(volume)?;
        self.persist_settings();
        Ok(())
    }

    fn persist_settings(&self) {
        if let Err(err) = self.settings.save(&self.db) {
            warn!(%err, "settings not persisted; keeping in-memory only");
        }
    }

    // ── Todos & playlist ─────────────────────────────────────────────

    pub fn add_todo(&mut self, title: &str) -> Result<TodoItem> {
        self.todos.add(&self.db, title)
    }

    pub fn toggle_todo(&mut self, id: Uuid, done: bool) -> Result<()> {
        self.todos.toggle(&self.db, id, done)
    }

    pub fn remove_todo(&mut self, id: Uuid) -> Result<()> {
        self.todos.remove(&self.db, id)
    }

    pub fn add_video(&mut self, title: &str, url: &str) -> Result<VideoItem> {
        self.playlist.add(&self.db, title, url)
    }

    pub fn remove_video(&mut self, url: &str) -> Result<()> {
        self.playlist.remove(&self.db, url)
    }

    pub fn select_video(&mut self, url: &str) -> Result<VideoItem> {
        Ok(self.playlist.select(url)?.clone())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Database::open_memory().unwrap())
    }

    #[test]
    fn fresh_app_has_zero_stats() {
        let app = app();
        assert_eq!(*app.stats(), UserStats::default());
    }

    #[test]
    fn stop_records_and_recomputes() {
        let mut app = app();
        app.start_stopwatch().unwrap();
        // Immediate stop is under the threshold: nothing recorded.
        let events = app.stop().unwrap();
        assert!(events.is_empty());
        assert_eq!(app.stats().total_sessions, 0);
    }

    #[test]
    fn clear_partition_resets_state() {
        let mut app = app();
        app.add_todo("task").unwrap();
        app.clear_partition(Partition::Todo).unwrap();
        assert!(app.todos().items().is_empty());

        app.set_daily_goal(3_600_000).unwrap();
        app.clear_partition(Partition::Settings).unwrap();
        assert_eq!(*app.settings(), Settings::default());
    }

    #[test]
    fn clear_all_covers_every_partition() {
        let mut app = app();
        app.add_todo("task").unwrap();
        app.add_video("focus mix", "https://youtu.be/abc123xyz").unwrap();
        app.clear_all().unwrap();
        assert!(app.todos().items().is_empty());
        assert_eq!(app.playlist().videos().len(), 3);
    }
}
