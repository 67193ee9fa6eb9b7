//! Timer run state machine.
//!
//! The engine is wall-clock based: it owns no thread and advances only
//! when the caller invokes `tick()`. Elapsed time is recomputed from
//! timestamps on every flush, never accumulated from tick deltas, so a
//! suspended process (backgrounded tab in the original application)
//! catches up correctly on the next tick or resume.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Idle (stop/reset)
//! ```
//!
//! Pomodoro runs alternate focus and break phases inside `Running`,
//! looping until the user stops. Countdown runs complete automatically
//! at zero remaining.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;

use super::{PomodoroDurations, PomodoroPhase, TimerMode};

/// Runs shorter than this are discarded on stop instead of recorded.
pub const MIN_RECORDABLE_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// A finalized run, ready to be turned into a session record.
///
/// Produced by `stop()` or by automatic countdown completion. Interval
/// counts are only meaningful for pomodoro runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedRun {
    pub mode: TimerMode,
    pub started_at: DateTime<Utc>,
    /// Focused milliseconds, excluding paused intervals and pomodoro
    /// break phases.
    pub actual_focus_ms: u64,
    pub completed_focus: u32,
    pub completed_breaks: u32,
}

/// Point-in-time view of the engine for display collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub mode: Option<TimerMode>,
    pub phase: Option<PomodoroPhase>,
    /// Elapsed ms within the current interval (whole run for stopwatch).
    pub elapsed_ms: u64,
    /// Remaining ms for countdown/pomodoro intervals.
    pub remaining_ms: Option<u64>,
    pub actual_focus_ms: u64,
    pub completed_focus: u32,
    pub completed_breaks: u32,
    pub started_at: Option<DateTime<Utc>>,
}

/// Result of a `tick()` call: emitted events plus, when a countdown
/// run completed, the finalized run for the recorder.
#[derive(Debug, Default)]
pub struct TickResult {
    pub events: Vec<Event>,
    pub finished: Option<FinishedRun>,
}

/// The one live timer run. Exactly one instance is active at a time;
/// the application state owns it exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    mode: Option<TimerMode>,
    started_at: Option<DateTime<Utc>>,
    /// Elapsed ms within the current interval.
    interval_elapsed_ms: u64,
    /// Focused ms accumulated across the whole run.
    focus_ms: u64,
    /// Countdown target; 0 for other modes.
    target_ms: u64,
    /// Interval lengths captured when a pomodoro run starts.
    durations: PomodoroDurations,
    phase: PomodoroPhase,
    completed_focus: u32,
    completed_breaks: u32,
    /// Wall-clock anchor of the last flush, epoch ms. `None` unless
    /// running.
    #[serde(default)]
    anchor_epoch_ms: Option<u64>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            mode: None,
            started_at: None,
            interval_elapsed_ms: 0,
            focus_ms: 0,
            target_ms: 0,
            durations: PomodoroDurations::default(),
            phase: PomodoroPhase::Focus,
            completed_focus: 0,
            completed_breaks: 0,
            anchor_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> Option<TimerMode> {
        self.mode
    }

    pub fn phase(&self) -> Option<PomodoroPhase> {
        match self.mode {
            Some(TimerMode::Pomodoro) => Some(self.phase),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != TimerState::Idle
    }

    pub fn actual_focus_ms(&self) -> u64 {
        self.focus_ms
    }

    /// Remaining ms in the current interval, for countdown/pomodoro.
    pub fn remaining_ms(&self) -> Option<u64> {
        match self.mode? {
            TimerMode::Stopwatch => None,
            TimerMode::Countdown => Some(self.target_ms.saturating_sub(self.interval_elapsed_ms)),
            TimerMode::Pomodoro => {
                Some(self.interval_len().saturating_sub(self.interval_elapsed_ms))
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            mode: self.mode,
            phase: self.phase(),
            elapsed_ms: self.interval_elapsed_ms,
            remaining_ms: self.remaining_ms(),
            actual_focus_ms: self.focus_ms,
            completed_focus: self.completed_focus,
            completed_breaks: self.completed_breaks,
            started_at: self.started_at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_stopwatch(&mut self) -> Result<Event> {
        self.start_stopwatch_at(now_ms())
    }

    pub fn start_stopwatch_at(&mut self, now: u64) -> Result<Event> {
        self.begin(TimerMode::Stopwatch, now)
    }

    pub fn start_countdown(&mut self, target_ms: u64) -> Result<Event> {
        self.start_countdown_at(target_ms, now_ms())
    }

    pub fn start_countdown_at(&mut self, target_ms: u64, now: u64) -> Result<Event> {
        if target_ms == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "countdown".into(),
            }
            .into());
        }
        let event = self.begin(TimerMode::Countdown, now)?;
        self.target_ms = target_ms;
        Ok(event)
    }

    pub fn start_pomodoro(&mut self, durations: PomodoroDurations) -> Result<Event> {
        self.start_pomodoro_at(durations, now_ms())
    }

    pub fn start_pomodoro_at(&mut self, durations: PomodoroDurations, now: u64) -> Result<Event> {
        durations.validate()?;
        let event = self.begin(TimerMode::Pomodoro, now)?;
        self.durations = durations;
        Ok(event)
    }

    fn begin(&mut self, mode: TimerMode, now: u64) -> Result<Event> {
        if self.is_active() {
            return Err(CoreError::InvalidState(format!(
                "cannot start {}: a run is already active",
                mode.as_str()
            )));
        }
        *self = Self::new();
        self.state = TimerState::Running;
        self.mode = Some(mode);
        self.started_at = Some(epoch_to_utc(now));
        self.anchor_epoch_ms = Some(now);
        Ok(Event::TimerStarted {
            mode,
            at: epoch_to_utc(now),
        })
    }

    /// Advance the run from the wall clock.
    ///
    /// No-op (empty result) while paused or idle -- callers may keep a
    /// periodic tick loop going unconditionally.
    pub fn tick(&mut self) -> TickResult {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now: u64) -> TickResult {
        let mut result = TickResult::default();
        if self.state != TimerState::Running {
            return result;
        }
        self.flush(now, &mut result.events);
        // Completion is a value comparison, not a timeout: re-checked
        // on every tick so it also fires on the first tick after a
        // resume that crossed zero.
        if self.countdown_done() {
            result.events.push(Event::TimerCompleted {
                mode: TimerMode::Countdown,
                at: epoch_to_utc(now),
            });
            result.finished = self.finalize();
        } else {
            result.events.push(Event::TimerTick {
                elapsed_ms: self.interval_elapsed_ms,
                remaining_ms: self.remaining_ms(),
                at: epoch_to_utc(now),
            });
        }
        result
    }

    pub fn pause(&mut self) -> Result<Event> {
        self.pause_at(now_ms())
    }

    pub fn pause_at(&mut self, now: u64) -> Result<Event> {
        if self.state != TimerState::Running {
            return Err(CoreError::InvalidState("pause: no running timer".into()));
        }
        // Flush up to the pause instant, then drop the anchor so the
        // paused gap never counts.
        let mut events = Vec::new();
        self.flush(now, &mut events);
        self.state = TimerState::Paused;
        self.anchor_epoch_ms = None;
        Ok(Event::TimerPaused {
            elapsed_ms: self.interval_elapsed_ms,
            at: epoch_to_utc(now),
        })
    }

    pub fn resume(&mut self) -> Result<Event> {
        self.resume_at(now_ms())
    }

    pub fn resume_at(&mut self, now: u64) -> Result<Event> {
        if self.state != TimerState::Paused {
            return Err(CoreError::InvalidState("resume: timer is not paused".into()));
        }
        self.state = TimerState::Running;
        self.anchor_epoch_ms = Some(now);
        Ok(Event::TimerResumed {
            elapsed_ms: self.interval_elapsed_ms,
            at: epoch_to_utc(now),
        })
    }

    /// Discard the current run without recording anything.
    pub fn reset(&mut self) -> Event {
        *self = Self::new();
        Event::TimerReset { at: Utc::now() }
    }

    /// Finalize the run for recording. Returns `None` when the run is
    /// too short to be worth a session record.
    pub fn stop(&mut self) -> Result<Option<FinishedRun>> {
        self.stop_at(now_ms())
    }

    pub fn stop_at(&mut self, now: u64) -> Result<Option<FinishedRun>> {
        if !self.is_active() {
            return Err(CoreError::InvalidState("stop: no active timer".into()));
        }
        if self.state == TimerState::Running {
            let mut events = Vec::new();
            self.flush(now, &mut events);
        }
        Ok(self.finalize())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn interval_len(&self) -> u64 {
        match self.phase {
            PomodoroPhase::Focus => self.durations.focus_ms,
            PomodoroPhase::Break => self.durations.break_ms,
        }
    }

    fn countdown_done(&self) -> bool {
        self.mode == Some(TimerMode::Countdown) && self.interval_elapsed_ms >= self.target_ms
    }

    /// Apply wall-clock time since the last anchor.
    fn flush(&mut self, now: u64, events: &mut Vec<Event>) {
        let Some(anchor) = self.anchor_epoch_ms else {
            return;
        };
        let mut delta = now.saturating_sub(anchor);
        self.anchor_epoch_ms = Some(now);

        match self.mode {
            Some(TimerMode::Stopwatch) => {
                self.interval_elapsed_ms += delta;
                self.focus_ms += delta;
            }
            Some(TimerMode::Countdown) => {
                // Clamp at the target so remaining never goes negative.
                let room = self.target_ms.saturating_sub(self.interval_elapsed_ms);
                let step = delta.min(room);
                self.interval_elapsed_ms += step;
                self.focus_ms += step;
            }
            Some(TimerMode::Pomodoro) => {
                // A long suspension can span several intervals; loop,
                // carrying the leftover into each next phase.
                loop {
                    let room = self.interval_len().saturating_sub(self.interval_elapsed_ms);
                    if delta < room {
                        self.interval_elapsed_ms += delta;
                        if self.phase == PomodoroPhase::Focus {
                            self.focus_ms += delta;
                        }
                        break;
                    }
                    delta -= room;
                    match self.phase {
                        PomodoroPhase::Focus => {
                            self.focus_ms += room;
                            self.completed_focus += 1;
                            self.phase = PomodoroPhase::Break;
                            events.push(Event::BreakStarted {
                                completed_focus: self.completed_focus,
                                at: epoch_to_utc(now),
                            });
                        }
                        PomodoroPhase::Break => {
                            self.completed_breaks += 1;
                            self.phase = PomodoroPhase::Focus;
                            events.push(Event::BreakEnded {
                                completed_breaks: self.completed_breaks,
                                at: epoch_to_utc(now),
                            });
                        }
                    }
                    self.interval_elapsed_ms = 0;
                }
            }
            None => {}
        }
    }

    fn finalize(&mut self) -> Option<FinishedRun> {
        let run = match (self.mode, self.started_at) {
            (Some(mode), Some(started_at)) => {
                let recordable = self.focus_ms >= MIN_RECORDABLE_MS
                    || self.completed_focus > 0
                    || self.completed_breaks > 0;
                recordable.then_some(FinishedRun {
                    mode,
                    started_at,
                    actual_focus_ms: self.focus_ms,
                    completed_focus: self.completed_focus,
                    completed_breaks: self.completed_breaks,
                })
            }
            _ => None,
        };
        *self = Self::new();
        run
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn epoch_to_utc(ms: u64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms as i64).unwrap_or_else(Utc::now)
}
