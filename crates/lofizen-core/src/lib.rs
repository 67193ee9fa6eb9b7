//! # Lofizen Core Library
//!
//! Core business logic for Lofizen, a local-first focus companion:
//! a focus timer (stopwatch, countdown, pomodoro), a task list, an
//! ambient-video playlist, and usage statistics. Everything persists
//! on one device; there is no server side.
//!
//! ## Architecture
//!
//! - **Timer engine**: a wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick()` for progress updates
//! - **Session recorder**: turns finished runs into durable records
//!   and owns the history
//! - **Statistics engine**: a pure function deriving aggregates
//!   (totals, streaks, today's progress) from the history on demand
//! - **Storage**: SQLite-backed key-value store with closed partitions
//!
//! ## Key components
//!
//! - [`TimerEngine`]: the one live timer run
//! - [`SessionRecorder`]: session history, in memory and durable
//! - [`compute_stats`]: history -> [`UserStats`], side-effect free
//! - [`App`]: explicit application state tying the pieces together

pub mod app;
pub mod error;
pub mod events;
pub mod format;
pub mod playlist;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod todo;

pub use app::App;
pub use error::{CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use playlist::{Playlist, VideoItem};
pub use session::{SessionRecord, SessionRecorder};
pub use settings::Settings;
pub use stats::{compute_stats, daily_goal_progress, UserStats};
pub use storage::{Database, Partition};
pub use timer::{
    FinishedRun, PomodoroDurations, PomodoroPhase, TimerEngine, TimerMode, TimerState,
};
pub use todo::{TodoItem, TodoList};
