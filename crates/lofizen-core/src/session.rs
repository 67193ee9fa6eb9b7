//! Session records and the recorder that owns the history.
//!
//! A finalized timer run becomes one durable `SessionRecord`. The
//! recorder keeps the authoritative in-memory history and writes
//! through to the store; a failed write is logged and swallowed so an
//! active focus session never breaks over lost durability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::storage::{Database, Partition};
use crate::timer::{FinishedRun, TimerMode};

/// One completed or stopped timer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub mode: TimerMode,
    /// When the run began -- not when the record was written.
    pub started_at: DateTime<Utc>,
    /// Focused milliseconds, excluding paused intervals.
    pub actual_focus_ms: u64,
    /// Completed focus intervals; `None` for non-pomodoro runs and for
    /// pomodoro runs abandoned before any interval finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_focus_sessions: Option<u32>,
    /// Completed break intervals; same absence rule as above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_breaks: Option<u32>,
}

impl SessionRecord {
    fn from_run(run: FinishedRun) -> Self {
        let (focus, breaks) = match run.mode {
            TimerMode::Pomodoro => (
                (run.completed_focus > 0).then_some(run.completed_focus),
                (run.completed_breaks > 0).then_some(run.completed_breaks),
            ),
            _ => (None, None),
        };
        Self {
            id: Uuid::new_v4(),
            mode: run.mode,
            started_at: run.started_at,
            actual_focus_ms: run.actual_focus_ms,
            completed_focus_sessions: focus,
            completed_breaks: breaks,
        }
    }
}

/// Owns the session history, in memory and in the store.
#[derive(Debug, Default)]
pub struct SessionRecorder {
    history: Vec<SessionRecord>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[SessionRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Seed the history from the store. Called once at startup.
    pub fn load(&mut self, db: &Database) -> Result<(), StorageError> {
        self.history = db.get_all(Partition::Session)?;
        self.history.sort_by_key(|s: &SessionRecord| s.started_at);
        Ok(())
    }

    /// Turn a finalized run into a durable record.
    ///
    /// The in-memory append always succeeds; a store failure is logged
    /// and the record stays valid for this process lifetime.
    pub fn record(&mut self, db: &Database, run: FinishedRun) -> SessionRecord {
        let record = SessionRecord::from_run(run);
        if let Err(err) = db.put(Partition::Session, &record.id.to_string(), &record) {
            warn!(id = %record.id, %err, "session not persisted; keeping in-memory only");
        }
        self.history.push(record.clone());
        record
    }

    /// Remove one record, in memory and durably.
    pub fn delete(&mut self, db: &Database, id: Uuid) -> Result<(), StorageError> {
        self.history.retain(|s| s.id != id);
        db.delete(Partition::Session, &id.to_string())
    }

    /// Remove the entire history, in memory and durably.
    pub fn clear(&mut self, db: &Database) -> Result<(), StorageError> {
        self.history.clear();
        db.clear(Partition::Session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;

    fn run(mode: TimerMode, focus_ms: u64, completed: (u32, u32)) -> FinishedRun {
        FinishedRun {
            mode,
            started_at: Utc::now(),
            actual_focus_ms: focus_ms,
            completed_focus: completed.0,
            completed_breaks: completed.1,
        }
    }

    #[test]
    fn record_persists_and_appends() {
        let db = Database::open_memory().unwrap();
        let mut recorder = SessionRecorder::new();
        let rec = recorder.record(&db, run(TimerMode::Stopwatch, 1_500_000, (0, 0)));
        assert_eq!(recorder.len(), 1);
        assert_eq!(rec.actual_focus_ms, 1_500_000);
        assert!(rec.completed_focus_sessions.is_none());

        let mut reloaded = SessionRecorder::new();
        reloaded.load(&db).unwrap();
        assert_eq!(reloaded.history(), recorder.history());
    }

    #[test]
    fn abandoned_pomodoro_counters_are_absent() {
        let db = Database::open_memory().unwrap();
        let mut recorder = SessionRecorder::new();
        let rec = recorder.record(&db, run(TimerMode::Pomodoro, 12_000, (0, 0)));
        assert!(rec.completed_focus_sessions.is_none());
        assert!(rec.completed_breaks.is_none());

        let rec = recorder.record(&db, run(TimerMode::Pomodoro, 3_000_000, (2, 1)));
        assert_eq!(rec.completed_focus_sessions, Some(2));
        assert_eq!(rec.completed_breaks, Some(1));
    }

    #[test]
    fn delete_and_clear() {
        let db = Database::open_memory().unwrap();
        let mut recorder = SessionRecorder::new();
        let a = recorder.record(&db, run(TimerMode::Stopwatch, 2000, (0, 0)));
        recorder.record(&db, run(TimerMode::Countdown, 3000, (0, 0)));

        recorder.delete(&db, a.id).unwrap();
        assert_eq!(recorder.len(), 1);
        let mut reloaded = SessionRecorder::new();
        reloaded.load(&db).unwrap();
        assert_eq!(reloaded.len(), 1);

        recorder.clear(&db).unwrap();
        reloaded.load(&db).unwrap();
        assert!(reloaded.is_empty());
    }
}
