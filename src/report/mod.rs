//! Monthly aggregation and report queries.
//!
//! This module contains the read side of the engine: listing queries,
//! per-employee and per-unit monthly reports with absence fill-in, and the
//! working-day calendar collaborator used to decide which missing days
//! count as absences.

mod aggregator;
mod calendar;

pub use aggregator::{
    employee_month_rows, month_bounds, monthly_report, unit_day_rows, unit_month_rows, unit_report,
};
pub use calendar::{RotationCalendar, WorkCalendar};
