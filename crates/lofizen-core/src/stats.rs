//! Statistics engine.
//!
//! `compute_stats` is a pure function of the session history, the
//! pomodoro durations, and the caller's notion of "today". It holds no
//! state and reads no clock, so it is callable from any scheduling
//! context, including tests. The application recomputes it explicitly
//! whenever the history changes.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;
use crate::timer::{PomodoroDurations, TimerMode};

/// Aggregate metrics derived from the full session history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_sessions: u64,
    pub total_focus_ms: u64,
    pub total_break_ms: u64,
    pub average_session_ms: u64,
    pub stopwatch_sessions: u64,
    pub pomodoro_sessions: u64,
    pub completed_pomodoros: u64,
    pub completed_breaks: u64,
    pub longest_session_ms: u64,
    pub todays_sessions: u64,
    pub todays_time_ms: u64,
    /// Consecutive calendar days with at least one session, counted
    /// backward from today. Zero when today has no session.
    pub current_streak: u64,
}

/// Local calendar date of a session's start -- the day bucket used for
/// today-matching and streaks. Time of day is ignored.
fn day_bucket(at: DateTime<chrono::Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// Focus-time contribution of one session.
///
/// Stopwatch and countdown contribute their measured focus time. A
/// pomodoro run contributes completed intervals times the configured
/// focus length, and nothing at all when either counter is absent or
/// zero (abandoned run).
fn focus_contribution(session: &SessionRecord, durations: &PomodoroDurations) -> u64 {
    match session.mode {
        TimerMode::Stopwatch | TimerMode::Countdown => session.actual_focus_ms,
        TimerMode::Pomodoro => {
            let focus = session.completed_focus_sessions.unwrap_or(0);
            let breaks = session.completed_breaks.unwrap_or(0);
            if focus == 0 || breaks == 0 {
                0
            } else {
                u64::from(focus).saturating_mul(durations.focus_ms)
            }
        }
    }
}

/// Derive `UserStats` from the session history.
///
/// Deterministic given identical arguments; `today` is the caller's
/// local calendar date (`Local::now().date_naive()` in production).
pub fn compute_stats(
    history: &[SessionRecord],
    durations: &PomodoroDurations,
    today: NaiveDate,
) -> UserStats {
    let mut stats = UserStats::default();
    stats.total_sessions = history.len() as u64;

    for session in history {
        stats.longest_session_ms = stats.longest_session_ms.max(session.actual_focus_ms);

        match session.mode {
            TimerMode::Stopwatch | TimerMode::Countdown => {
                stats.stopwatch_sessions += 1;
                stats.total_focus_ms += session.actual_focus_ms;
            }
            TimerMode::Pomodoro => {
                stats.pomodoro_sessions += 1;
                let focus = session.completed_focus_sessions.unwrap_or(0);
                let breaks = session.completed_breaks.unwrap_or(0);
                // Abandoned runs count as sessions but contribute no time.
                if focus > 0 && breaks > 0 {
                    stats.completed_pomodoros += u64::from(focus);
                    stats.completed_breaks += u64::from(breaks);
                    stats.total_focus_ms +=
                        u64::from(focus).saturating_mul(durations.focus_ms);
                    stats.total_break_ms +=
                        u64::from(breaks).saturating_mul(durations.break_ms);
                }
            }
        }

        if day_bucket(session.started_at) == today {
            stats.todays_sessions += 1;
            stats.todays_time_ms += focus_contribution(session, durations);
        }
    }

    if stats.total_sessions > 0 {
        stats.average_session_ms =
            (stats.total_focus_ms + stats.total_break_ms) / stats.total_sessions;
    }
    stats.current_streak = current_streak(history, today);
    stats
}

/// Count consecutive session days backward from `today`, stopping at
/// the first gap. No session today means streak zero regardless of
/// what came before.
fn current_streak(history: &[SessionRecord], today: NaiveDate) -> u64 {
    let days: HashSet<NaiveDate> = history.iter().map(|s| day_bucket(s.started_at)).collect();

    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Today's progress toward the daily goal, as a percentage capped at 100.
pub fn daily_goal_progress(stats: &UserStats, daily_goal_ms: u64) -> u64 {
    if daily_goal_ms == 0 {
        return 0;
    }
    (stats.todays_time_ms.saturating_mul(100) / daily_goal_ms).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, TimeZone, Utc};
    use uuid::Uuid;

    fn durations() -> PomodoroDurations {
        PomodoroDurations::default()
    }

    fn session(mode: TimerMode, started_at: DateTime<Utc>, focus_ms: u64) -> SessionRecord {
        SessionRecord {
            id: Uuid::new_v4(),
            mode,
            started_at,
            actual_focus_ms: focus_ms,
            completed_focus_sessions: None,
            completed_breaks: None,
        }
    }

    fn local_noon(date: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn empty_history_is_all_zero() {
        let stats = compute_stats(&[], &durations(), today());
        assert_eq!(stats, UserStats::default());
    }

    #[test]
    fn stopwatch_session_today() {
        let history = vec![session(TimerMode::Stopwatch, local_noon(today()), 1_500_000)];
        let stats = compute_stats(&history, &durations(), today());
        assert_eq!(stats.total_focus_ms, 1_500_000);
        assert_eq!(stats.stopwatch_sessions, 1);
        assert_eq!(stats.todays_sessions, 1);
        assert_eq!(stats.todays_time_ms, 1_500_000);
        assert_eq!(stats.longest_session_ms, 1_500_000);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn pomodoro_contributes_completed_intervals() {
        let mut s = session(TimerMode::Pomodoro, local_noon(today()), 6_000_000);
        s.completed_focus_sessions = Some(4);
        s.completed_breaks = Some(3);
        let stats = compute_stats(&[s], &durations(), today());
        assert_eq!(stats.total_focus_ms, 4 * 1_500_000);
        assert_eq!(stats.total_break_ms, 3 * 300_000);
        assert_eq!(stats.pomodoro_sessions, 1);
        assert_eq!(stats.completed_pomodoros, 4);
        assert_eq!(stats.completed_breaks, 3);
    }

    #[test]
    fn abandoned_pomodoro_counts_session_but_no_time() {
        let mut s = session(TimerMode::Pomodoro, local_noon(today()), 90_000);
        s.completed_focus_sessions = None;
        s.completed_breaks = None;
        let stats = compute_stats(&[s], &durations(), today());
        assert_eq!(stats.pomodoro_sessions, 1);
        assert_eq!(stats.total_focus_ms, 0);
        assert_eq!(stats.total_break_ms, 0);
        assert_eq!(stats.todays_sessions, 1);
        assert_eq!(stats.todays_time_ms, 0);
    }

    #[test]
    fn pomodoro_with_zero_focus_counter_contributes_nothing() {
        let mut s = session(TimerMode::Pomodoro, local_noon(today()), 90_000);
        s.completed_focus_sessions = Some(0);
        s.completed_breaks = None;
        let stats = compute_stats(&[s], &durations(), today());
        assert_eq!(stats.pomodoro_sessions, 1);
        assert_eq!(stats.total_focus_ms, 0);
        assert_eq!(stats.completed_pomodoros, 0);
    }

    #[test]
    fn average_guards_division_by_zero() {
        assert_eq!(compute_stats(&[], &durations(), today()).average_session_ms, 0);
        let history = vec![
            session(TimerMode::Stopwatch, local_noon(today()), 1000),
            session(TimerMode::Countdown, local_noon(today()), 3000),
        ];
        let stats = compute_stats(&history, &durations(), today());
        assert_eq!(stats.average_session_ms, 2000);
    }

    #[test]
    fn streak_requires_today() {
        // Sessions on each of the 10 days before today, none today.
        let t = today();
        let history: Vec<_> = (1..=10u64)
            .map(|n| {
                session(
                    TimerMode::Stopwatch,
                    local_noon(t.checked_sub_days(Days::new(n)).unwrap()),
                    60_000,
                )
            })
            .collect();
        let stats = compute_stats(&history, &durations(), t);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        // Today, yesterday, and 3 days ago (gap at day 2).
        let t = today();
        let history = vec![
            session(TimerMode::Stopwatch, local_noon(t), 60_000),
            session(
                TimerMode::Stopwatch,
                local_noon(t.checked_sub_days(Days::new(1)).unwrap()),
                60_000,
            ),
            session(
                TimerMode::Stopwatch,
                local_noon(t.checked_sub_days(Days::new(3)).unwrap()),
                60_000,
            ),
        ];
        let stats = compute_stats(&history, &durations(), t);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn compute_stats_is_idempotent() {
        let mut s = session(TimerMode::Pomodoro, local_noon(today()), 1_000_000);
        s.completed_focus_sessions = Some(2);
        s.completed_breaks = Some(2);
        let history = vec![s, session(TimerMode::Countdown, local_noon(today()), 5000)];
        let a = compute_stats(&history, &durations(), today());
        let b = compute_stats(&history, &durations(), today());
        assert_eq!(a, b);
    }

    #[test]
    fn goal_progress_caps_at_100() {
        let mut stats = UserStats::default();
        stats.todays_time_ms = 3_600_000;
        assert_eq!(daily_goal_progress(&stats, 7_200_000), 50);
        assert_eq!(daily_goal_progress(&stats, 1_000_000), 100);
        assert_eq!(daily_goal_progress(&stats, 0), 0);
    }
}
