//! Core data models for the punch reconciliation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod duration;
mod employee;
mod punch;
mod report;

pub use duration::WorkDuration;
pub use employee::{Employee, LeavePeriod, ShiftType, Unit};
pub use punch::{HoursBreakdown, PunchEvent, PunchKind, PunchOutcome, PunchRecord};
pub use report::{DayRow, HourTotals, MonthlyReport, PunchRow, ReportHeader, UnitReport};
