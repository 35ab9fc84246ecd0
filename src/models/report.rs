//! Report output models.
//!
//! These are the read-side structures produced by the monthly aggregator and
//! the listing queries. They are pure outputs; nothing in this module writes
//! back to the ledger.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::duration::WorkDuration;
use super::employee::{ShiftType, Unit};

/// A denormalized listing row, one per punch record.
///
/// Unit-scoped month listings also emit one row with no date for each
/// employee that has no punches in the period, so absent employees are
/// visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRow {
    /// The employee the row belongs to.
    pub employee_id: u64,
    /// Denormalized employee name.
    pub employee_name: String,
    /// The employee's registration number.
    pub registration: String,
    /// The employee's shift type.
    pub shift_type: ShiftType,
    /// The employee's admission date.
    pub admission_date: NaiveDate,
    /// Denormalized unit name.
    pub unit_name: String,
    /// The punch date; absent for zero-punch filler rows.
    pub date: Option<NaiveDate>,
    /// Entry wall-clock time, when recorded.
    pub entry_time: Option<NaiveTime>,
    /// Exit wall-clock time, when recorded.
    pub exit_time: Option<NaiveTime>,
}

/// One day of a monthly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRow {
    /// The calendar day.
    pub date: NaiveDate,
    /// Entry wall-clock time, when recorded.
    pub entry_time: Option<NaiveTime>,
    /// Exit wall-clock time, when recorded.
    pub exit_time: Option<NaiveTime>,
    /// Worked time within the scheduled duration.
    pub normal: Option<WorkDuration>,
    /// Worked time beyond the scheduled duration.
    pub extra: Option<WorkDuration>,
    /// Scheduled-but-not-worked time.
    pub discount: Option<WorkDuration>,
    /// Justification for the day (overtime label, leave reason, "absence").
    pub justification: Option<String>,
}

/// Aggregated hour totals for a period.
///
/// `adjusted_extra`/`adjusted_discount` net overtime against discount time:
/// when both are positive only the balance survives, on whichever side it
/// falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourTotals {
    /// Sum of normal hours.
    pub normal: WorkDuration,
    /// Sum of extra hours.
    pub extra: WorkDuration,
    /// Sum of discount hours.
    pub discount: WorkDuration,
    /// Extra hours after netting against discounts.
    pub adjusted_extra: WorkDuration,
    /// Discount hours after netting against extras.
    pub adjusted_discount: WorkDuration,
}

impl HourTotals {
    /// Builds totals from raw sums, netting extras against discounts.
    pub fn from_components(
        normal: WorkDuration,
        extra: WorkDuration,
        discount: WorkDuration,
    ) -> Self {
        let (adjusted_extra, adjusted_discount) = if !extra.is_zero() && !discount.is_zero() {
            if extra >= discount {
                (extra.saturating_sub(discount), WorkDuration::ZERO)
            } else {
                (WorkDuration::ZERO, discount.saturating_sub(extra))
            }
        } else {
            (extra, discount)
        };

        HourTotals {
            normal,
            extra,
            discount,
            adjusted_extra,
            adjusted_discount,
        }
    }
}

/// Identity block at the top of a monthly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    /// The employee the report covers.
    pub employee_id: u64,
    /// The employee's name.
    pub employee_name: String,
    /// The employee's registration number.
    pub registration: String,
    /// The employee's shift type.
    pub shift_type: ShiftType,
    /// The unit name.
    pub unit_name: String,
    /// The report month (1-12).
    pub month: u32,
    /// The report year.
    pub year: i32,
}

/// A monthly report for one employee: header, totals and per-day rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Who and when the report covers.
    pub header: ReportHeader,
    /// Aggregated hour totals.
    pub totals: HourTotals,
    /// Per-day rows in ascending date order.
    pub days: Vec<DayRow>,
}

/// A unit-scoped monthly report: one [`MonthlyReport`] per active employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    /// The unit the report covers.
    pub unit: Unit,
    /// The report month (1-12).
    pub month: u32,
    /// The report year.
    pub year: i32,
    /// Per-employee reports, ordered by employee name.
    pub employees: Vec<MonthlyReport>,
}
