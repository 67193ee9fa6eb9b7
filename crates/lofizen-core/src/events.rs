use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::UserStats;
use crate::timer::TimerMode;

/// Every observable state change produces an `Event`.
///
/// Presentation collaborators consume these: the break overlay listens
/// for `BreakStarted`/`BreakEnded`, the stats display for
/// `StatsRecomputed`. Nothing in the core reacts to its own events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    TimerTick {
        elapsed_ms: u64,
        /// Remaining time for countdown/pomodoro; absent for stopwatch.
        remaining_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the run is finalized automatically.
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// Pomodoro focus interval finished, break phase begins.
    BreakStarted {
        completed_focus: u32,
        at: DateTime<Utc>,
    },
    /// Pomodoro break interval finished, next focus phase begins.
    BreakEnded {
        completed_breaks: u32,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        id: Uuid,
        at: DateTime<Utc>,
    },
    StatsRecomputed {
        stats: UserStats,
        at: DateTime<Utc>,
    },
}
