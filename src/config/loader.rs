//! Schedule table loading and shift classification.
//!
//! This module provides the [`ScheduleBook`] type: the explicit,
//! inspectable mapping from shift-type code to pairing class and
//! scheduled-end rule, loaded from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Duration;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::ShiftType;

use super::types::{EngineSettings, ScheduleFile, ScheduleRule, ShiftClass};

/// The rule applied when a shift-type code is missing from the table.
///
/// Unmapped codes classify as standard with an eight-hour scheduled end,
/// matching the behaviour of the system this engine replaces. See DESIGN.md
/// for the open question on rejecting them instead.
const FALLBACK_RULE: ScheduleRule = ScheduleRule {
    pairing: ShiftClass::Standard,
    end_hour: 17,
};

/// Loads and provides access to the shift schedule table.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── schedules.yaml   # shift-type → pairing class + scheduled-end rule
/// └── settings.yaml    # lookback window, minimum exit gap
/// ```
///
/// # Example
///
/// ```no_run
/// use punch_engine::config::ScheduleBook;
/// use punch_engine::models::ShiftType;
///
/// let book = ScheduleBook::load("./config/default").unwrap();
/// let rule = book.rule_for(ShiftType::TwentyFourBySeventyTwo);
/// assert_eq!(rule.end_hour, 31);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleBook {
    schedules: HashMap<String, ScheduleRule>,
    settings: EngineSettings,
}

impl ScheduleBook {
    /// Loads the schedule table and settings from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` when a required file is missing and
    /// `ConfigParseError` when a file contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let schedules_path = path.join("schedules.yaml");
        let schedule_file = Self::load_yaml::<ScheduleFile>(&schedules_path)?;

        let settings_path = path.join("settings.yaml");
        let settings = Self::load_yaml::<EngineSettings>(&settings_path)?;

        Ok(Self::from_parts(schedule_file.schedules, settings))
    }

    /// Builds a schedule book directly from its parts.
    pub fn from_parts(schedules: HashMap<String, ScheduleRule>, settings: EngineSettings) -> Self {
        ScheduleBook {
            schedules,
            settings,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the schedule rule for a shift type.
    ///
    /// Codes missing from the table classify as standard with the fallback
    /// eight-hour rule; the miss is logged so operators can tighten the
    /// table.
    pub fn rule_for(&self, shift_type: ShiftType) -> ScheduleRule {
        match self.schedules.get(shift_type.code()) {
            Some(rule) => *rule,
            None => {
                warn!(
                    shift_type = %shift_type,
                    "Shift type not in schedule table, classifying as standard"
                );
                FALLBACK_RULE
            }
        }
    }

    /// Classifies a shift type as standard or special.
    pub fn classify(&self, shift_type: ShiftType) -> ShiftClass {
        self.rule_for(shift_type).pairing
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Returns the open-entry lookback window as a chrono duration.
    pub fn lookback(&self) -> Duration {
        Duration::days(self.settings.lookback_days)
    }

    /// Returns the minimum entry-to-exit gap as a chrono duration.
    pub fn min_exit_gap(&self) -> Duration {
        Duration::minutes(self.settings.min_exit_gap_minutes)
    }
}
