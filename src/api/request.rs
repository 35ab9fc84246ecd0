//! Request types for the punch reconciliation API.
//!
//! This module defines the JSON request bodies and query parameters for the
//! punch and report endpoints.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{HoursBreakdown, PunchEvent};

/// Request body for `POST /punches`.
///
/// Carries explicit times; at least one of `entry_time`/`exit_time` must be
/// present. `date` defaults to today, and `exit_date` covers pairs that end
/// on a different day than they start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePunchRequest {
    /// The employee that punched.
    pub employee_id: u64,
    /// The unit the punch was registered at.
    pub unit_id: u64,
    /// The date of the event.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Entry wall-clock time.
    #[serde(default)]
    pub entry_time: Option<NaiveTime>,
    /// Exit wall-clock time.
    #[serde(default)]
    pub exit_time: Option<NaiveTime>,
    /// Date of the exit when it falls on a different day than `date`.
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
    /// Opaque biometric reference from the capture device.
    #[serde(default)]
    pub biometric_ref: Option<String>,
    /// Pre-computed hour components, stored as authoritative for standard
    /// combined records when present.
    #[serde(default)]
    pub hours: Option<HoursBreakdown>,
}

impl From<CreatePunchRequest> for PunchEvent {
    fn from(req: CreatePunchRequest) -> Self {
        PunchEvent {
            employee_id: req.employee_id,
            unit_id: req.unit_id,
            date: req.date,
            entry_time: req.entry_time,
            exit_time: req.exit_time,
            exit_date: req.exit_date,
            biometric_ref: req.biometric_ref,
            hours: req.hours,
        }
    }
}

/// Request body for `POST /punches/clock`, the auto-direction kiosk flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockPunchRequest {
    /// The employee that punched.
    pub employee_id: u64,
    /// The unit the terminal belongs to.
    pub unit_id: u64,
    /// Event instant; defaults to now.
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
    /// Opaque biometric reference from the capture device.
    #[serde(default)]
    pub biometric_ref: Option<String>,
}

/// Request body for `PUT /punches/{id}`.
///
/// Times are `HH:MM` strings, validated before any write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectPunchRequest {
    /// The corrected entry time.
    pub entry_time: String,
    /// The corrected exit time.
    pub exit_time: String,
}

/// Query parameters scoping a request to an employee and month.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeePeriodQuery {
    /// The employee id.
    pub employee_id: u64,
    /// The month (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
}

/// Query parameters scoping a request to a unit and month.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitPeriodQuery {
    /// The unit id.
    pub unit_id: u64,
    /// The month (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
}

/// Query parameters for the unit day listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DayQuery {
    /// The day to list; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
