//! Employee, unit and leave models.
//!
//! These types mirror the master data owned by the out-of-scope CRUD
//! collaborators. The engine reads them through the `ledger::Directory`
//! trait and never mutates them.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The shift-type code assigned to an employee.
///
/// Standard codes describe a fixed daily duration; the two rotation codes
/// (`12x36` and `24x72`) describe on/off cycles whose entry and exit punches
/// fall on different calendar days. Codes outside the known set map to
/// [`ShiftType::Unknown`] so master data with a stray code still
/// deserializes (and classifies as standard downstream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftType {
    /// Eight-hour daily shift.
    EightHour,
    /// Twelve-hour daily shift.
    TwelveHour,
    /// Sixteen-hour daily shift.
    SixteenHour,
    /// Twenty-hour weekly schedule.
    TwentyHour,
    /// Twenty-four-hour daily shift.
    TwentyFourHour,
    /// Thirty-two-hour weekly schedule.
    ThirtyTwoHour,
    /// Twelve hours on, thirty-six hours off rotation.
    TwelveByThirtySix,
    /// Twenty-four hours on, seventy-two hours off rotation.
    TwentyFourBySeventyTwo,
    /// A code the schedule table does not know about.
    Unknown,
}

impl ShiftType {
    /// Returns the wire code for this shift type.
    pub fn code(&self) -> &'static str {
        match self {
            ShiftType::EightHour => "8h",
            ShiftType::TwelveHour => "12h",
            ShiftType::SixteenHour => "16h",
            ShiftType::TwentyHour => "20h",
            ShiftType::TwentyFourHour => "24h",
            ShiftType::ThirtyTwoHour => "32h",
            ShiftType::TwelveByThirtySix => "12x36",
            ShiftType::TwentyFourBySeventyTwo => "24x72",
            ShiftType::Unknown => "unknown",
        }
    }

    /// Parses a wire code; unrecognized codes become [`ShiftType::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "8h" => ShiftType::EightHour,
            "12h" => ShiftType::TwelveHour,
            "16h" => ShiftType::SixteenHour,
            "20h" => ShiftType::TwentyHour,
            "24h" => ShiftType::TwentyFourHour,
            "32h" => ShiftType::ThirtyTwoHour,
            "12x36" => ShiftType::TwelveByThirtySix,
            "24x72" => ShiftType::TwentyFourBySeventyTwo,
            _ => ShiftType::Unknown,
        }
    }
}

impl Serialize for ShiftType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ShiftType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(ShiftType::from_code(&code))
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An employee subject to punch reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: u64,
    /// The employee's full name.
    pub name: String,
    /// The municipal registration number.
    pub registration: String,
    /// The unit the employee is assigned to.
    pub unit_id: u64,
    /// The shift-type code driving pairing and scheduled-end rules.
    pub shift_type: ShiftType,
    /// The date the employee was admitted.
    pub admission_date: NaiveDate,
    /// Inactive employees are excluded from reports.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A workplace unit that punches are registered against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier for the unit.
    pub id: u64,
    /// The unit's name.
    pub name: String,
}

/// A leave period (vacation or formal absence) for an employee.
///
/// Punching is blocked during leave, and absent report days inside a leave
/// period carry its reason as the justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePeriod {
    /// First day of the leave, inclusive.
    pub start: NaiveDate,
    /// Last day of the leave, inclusive.
    pub end: NaiveDate,
    /// Human-readable reason (e.g. "vacation", "medical leave").
    pub reason: String,
}

impl LeavePeriod {
    /// Returns true when `date` falls inside this leave period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_shift_type_codes_round_trip_through_serde() {
        for (code, shift) in [
            ("8h", ShiftType::EightHour),
            ("12h", ShiftType::TwelveHour),
            ("16h", ShiftType::SixteenHour),
            ("20h", ShiftType::TwentyHour),
            ("24h", ShiftType::TwentyFourHour),
            ("32h", ShiftType::ThirtyTwoHour),
            ("12x36", ShiftType::TwelveByThirtySix),
            ("24x72", ShiftType::TwentyFourBySeventyTwo),
        ] {
            let json = format!("\"{}\"", code);
            let parsed: ShiftType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, shift);
            assert_eq!(serde_json::to_string(&shift).unwrap(), json);
            assert_eq!(shift.code(), code);
        }
    }

    #[test]
    fn test_unrecognized_code_deserializes_to_unknown() {
        let parsed: ShiftType = serde_json::from_str("\"6x18\"").unwrap();
        assert_eq!(parsed, ShiftType::Unknown);
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": 1,
            "name": "Maria Souza",
            "registration": "20250123",
            "unit_id": 3,
            "shift_type": "24x72",
            "admission_date": "2020-02-01"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, 1);
        assert_eq!(employee.shift_type, ShiftType::TwentyFourBySeventyTwo);
        assert_eq!(employee.admission_date, make_date("2020-02-01"));
        assert!(employee.active);
    }

    #[test]
    fn test_leave_period_contains_is_inclusive() {
        let leave = LeavePeriod {
            start: make_date("2025-06-10"),
            end: make_date("2025-06-20"),
            reason: "vacation".to_string(),
        };

        assert!(leave.contains(make_date("2025-06-10")));
        assert!(leave.contains(make_date("2025-06-15")));
        assert!(leave.contains(make_date("2025-06-20")));
        assert!(!leave.contains(make_date("2025-06-09")));
        assert!(!leave.contains(make_date("2025-06-21")));
    }
}
