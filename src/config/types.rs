//! Configuration types for the shift schedule table.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML schedule and settings files.

use serde::Deserialize;
use std::collections::HashMap;

/// The pairing strategy for a shift type.
///
/// Standard shifts produce one combined record per punch event; special
/// rotations produce separate entry/exit records that the state machine
/// pairs across calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftClass {
    /// One combined record per punch event.
    Standard,
    /// Separate entry/exit records requiring temporal pairing.
    Special,
}

impl std::fmt::Display for ShiftClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftClass::Standard => write!(f, "standard"),
            ShiftClass::Special => write!(f, "special"),
        }
    }
}

/// The schedule rule for one shift type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScheduleRule {
    /// How punches for this shift type are paired.
    pub pairing: ShiftClass,
    /// Scheduled end of the shift, in hours after midnight of the entry
    /// date. Values above 24 land on the following day.
    pub end_hour: u32,
}

/// Schedule file structure (`schedules.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleFile {
    /// Map of shift-type code to schedule rule.
    pub schedules: HashMap<String, ScheduleRule>,
}

/// Engine settings (`settings.yaml`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EngineSettings {
    /// Trailing window, in days, searched when matching an exit punch to an
    /// open entry.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Minimum minutes between an entry and the exit that closes it.
    #[serde(default = "default_min_exit_gap_minutes")]
    pub min_exit_gap_minutes: i64,
}

fn default_lookback_days() -> i64 {
    3
}

fn default_min_exit_gap_minutes() -> i64 {
    5
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            lookback_days: default_lookback_days(),
            min_exit_gap_minutes: default_min_exit_gap_minutes(),
        }
    }
}
