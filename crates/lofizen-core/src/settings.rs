//! User settings: daily goal, pomodoro durations, player volume.
//!
//! Persisted as a singleton record in the `settings` partition, the
//! way the original keeps them in IndexedDB rather than a config file.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError, ValidationError};
use crate::storage::{Database, Partition};
use crate::timer::{PomodoroDurations, ONE_HOUR_MS};

const SETTINGS_ID: &str = "settings";

/// Daily goals above 12 hours are rejected as implausible.
pub const MAX_DAILY_GOAL_MS: u64 = 12 * ONE_HOUR_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Daily focus goal in milliseconds.
    pub daily_goal_ms: u64,
    pub pomodoro: PomodoroDurations,
    /// Player volume, 0-100.
    pub volume: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal_ms: 2 * ONE_HOUR_MS,
            pomodoro: PomodoroDurations::default(),
            volume: 50,
        }
    }
}

impl Settings {
    pub fn load(db: &Database) -> Result<Self, StorageError> {
        Ok(db
            .get(Partition::Settings, SETTINGS_ID)?
            .unwrap_or_default())
    }

    pub fn save(&self, db: &Database) -> Result<(), StorageError> {
        db.put(Partition::Settings, SETTINGS_ID, self)
    }

    /// Set the daily goal. Must be positive and at most 12 hours.
    pub fn set_daily_goal(&mut self, ms: u64) -> Result<()> {
        if ms == 0 {
            return Err(ValidationError::ZeroDuration {
                field: "daily_goal".into(),
            }
            .into());
        }
        if ms > MAX_DAILY_GOAL_MS {
            return Err(ValidationError::invalid(
                "daily_goal",
                format!("must be at most {} hours", MAX_DAILY_GOAL_MS / ONE_HOUR_MS),
            )
            .into());
        }
        self.daily_goal_ms = ms;
        Ok(())
    }

    pub fn set_pomodoro(&mut self, durations: PomodoroDurations) -> Result<()> {
        durations.validate()?;
        self.pomodoro = durations;
        Ok(())
    }

    pub fn set_volume(&mut self, volume: u32) -> Result<()> {
        if volume > 100 {
            return Err(ValidationError::invalid("volume", "must be 0-100").into());
        }
        self.volume = volume;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.daily_goal_ms, 7_200_000);
        assert_eq!(s.pomodoro.focus_ms, 1_500_000);
        assert_eq!(s.volume, 50);
    }

    #[test]
    fn goal_bounds() {
        let mut s = Settings::default();
        assert!(s.set_daily_goal(0).is_err());
        assert!(s.set_daily_goal(MAX_DAILY_GOAL_MS + 1).is_err());
        s.set_daily_goal(MAX_DAILY_GOAL_MS).unwrap();
        assert_eq!(s.daily_goal_ms, MAX_DAILY_GOAL_MS);
    }

    #[test]
    fn volume_bounds() {
        let mut s = Settings::default();
        assert!(s.set_volume(101).is_err());
        s.set_volume(0).unwrap();
        s.set_volume(100).unwrap();
    }

    #[test]
    fn round_trips_through_store() {
        let db = Database::open_memory().unwrap();
        let mut s = Settings::default();
        s.set_daily_goal(3 * ONE_HOUR_MS).unwrap();
        s.save(&db).unwrap();
        assert_eq!(Settings::load(&db).unwrap(), s);
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let db = Database::open_memory().unwrap();
        assert_eq!(Settings::load(&db).unwrap(), Settings::default());
    }
}
