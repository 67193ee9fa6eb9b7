mod engine;

pub use engine::{FinishedRun, Snapshot, TimerEngine, TimerState, MIN_RECORDABLE_MS};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Stopwatch,
    Countdown,
    Pomodoro,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Stopwatch => "stopwatch",
            TimerMode::Countdown => "countdown",
            TimerMode::Pomodoro => "pomodoro",
        }
    }
}

/// Pomodoro alternates between these two phases while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    Focus,
    Break,
}

/// Interval lengths used to size pomodoro focus/break phases.
///
/// All values are integer milliseconds; rounding happens only at
/// display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroDurations {
    pub focus_ms: u64,
    pub break_ms: u64,
}

pub const ONE_MINUTE_MS: u64 = 60 * 1000;
pub const ONE_HOUR_MS: u64 = 60 * ONE_MINUTE_MS;

impl Default for PomodoroDurations {
    fn default() -> Self {
        Self {
            focus_ms: 25 * ONE_MINUTE_MS,
            break_ms: 5 * ONE_MINUTE_MS,
        }
    }
}

impl PomodoroDurations {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.focus_ms == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "pomodoro.focus".into(),
            });
        }
        if self.break_ms == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "pomodoro.break".into(),
            });
        }
        Ok(())
    }
}
