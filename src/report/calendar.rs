//! Expected working-day generation.
//!
//! Absence fill-in needs to know which days an employee was expected to
//! punch. That sequence is produced by the [`WorkCalendar`] collaborator;
//! [`RotationCalendar`] is the provided implementation, anchoring rotation
//! cycles on a reference date (the employee's admission date).

use chrono::{Duration, NaiveDate};

use crate::models::ShiftType;

/// Produces the expected working-day sequence for a shift type.
pub trait WorkCalendar: Send + Sync {
    /// Returns the days in `[start, end]` on which an employee with the
    /// given shift type is expected to punch, anchored on `reference`.
    fn expected_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        shift_type: ShiftType,
        reference: NaiveDate,
    ) -> Vec<NaiveDate>;
}

/// Cycle length in days for a shift type: rotations repeat every on+off
/// span, everything else is expected daily.
fn cycle_days(shift_type: ShiftType) -> i64 {
    match shift_type {
        ShiftType::TwelveByThirtySix => 2,
        ShiftType::TwentyFourBySeventyTwo => 4,
        _ => 1,
    }
}

/// Calendar that expands rotation cycles from a reference date.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationCalendar;

impl WorkCalendar for RotationCalendar {
    fn expected_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        shift_type: ShiftType,
        reference: NaiveDate,
    ) -> Vec<NaiveDate> {
        if start > end {
            return Vec::new();
        }

        let cycle = cycle_days(shift_type);
        if cycle == 1 {
            let mut days = Vec::new();
            let mut day = start;
            while day <= end {
                days.push(day);
                day += Duration::days(1);
            }
            return days;
        }

        // First expected day at or after both the window start and the
        // reference date, aligned to the cycle.
        let anchor = start.max(reference);
        let offset = (anchor - reference).num_days().rem_euclid(cycle);
        let mut day = if offset == 0 {
            anchor
        } else {
            anchor + Duration::days(cycle - offset)
        };

        let mut days = Vec::new();
        while day <= end {
            days.push(day);
            day += Duration::days(cycle);
        }
        days
    }
}
