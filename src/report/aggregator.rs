//! Monthly aggregation and listing queries.
//!
//! Pure, side-effect-free read operations over the punch ledger: nothing in
//! this module mutates a record. Totals accumulate in integer seconds from
//! the hour components stored on each record.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{EngineError, EngineResult};
use crate::ledger::{Directory, PunchStore};
use crate::models::{
    DayRow, Employee, HourTotals, LeavePeriod, MonthlyReport, PunchRecord, PunchRow, ReportHeader,
    UnitReport, WorkDuration,
};

use super::calendar::WorkCalendar;

/// Returns the first and last day of a month, validating the month number.
pub fn month_bounds(month: u32, year: i32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(EngineError::Validation {
        message: format!("invalid period {:02}/{}", month, year),
    })?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(EngineError::Validation {
        message: format!("invalid period {:02}/{}", month, year),
    })?;
    Ok((first, next_first - Duration::days(1)))
}

fn month_instants(month: u32, year: i32) -> EngineResult<(NaiveDateTime, NaiveDateTime)> {
    let (first, last) = month_bounds(month, year)?;
    let from = first.and_hms_opt(0, 0, 0).unwrap_or_default();
    let to = (last + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap_or_default();
    Ok((from, to))
}

fn punch_row(employee: &Employee, unit_name: &str, record: Option<&PunchRecord>) -> PunchRow {
    PunchRow {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        registration: employee.registration.clone(),
        shift_type: employee.shift_type,
        admission_date: employee.admission_date,
        unit_name: unit_name.to_string(),
        date: record.map(|r| r.punch_instant.date()),
        entry_time: record.and_then(|r| r.entry).map(|e| e.time()),
        exit_time: record.and_then(|r| r.exit).map(|e| e.time()),
    }
}

fn day_row(record: &PunchRecord) -> DayRow {
    DayRow {
        date: record.punch_instant.date(),
        entry_time: record.entry.map(|e| e.time()),
        exit_time: record.exit.map(|e| e.time()),
        normal: record.hours.as_ref().map(|h| h.normal),
        extra: record.hours.as_ref().map(|h| h.extra),
        discount: record.hours.as_ref().map(|h| h.discount),
        justification: record.hours.as_ref().and_then(|h| h.justification.clone()),
    }
}

/// Assembles one employee's report from their records and leave periods.
fn assemble_report(
    employee: &Employee,
    unit_name: &str,
    records: &[PunchRecord],
    leaves: &[LeavePeriod],
    expected: &[NaiveDate],
    month: u32,
    year: i32,
) -> MonthlyReport {
    let mut normal = WorkDuration::ZERO;
    let mut extra = WorkDuration::ZERO;
    let mut discount = WorkDuration::ZERO;

    let mut days: Vec<DayRow> = Vec::with_capacity(records.len() + expected.len());
    let mut punched: HashSet<NaiveDate> = HashSet::new();

    for record in records {
        if let Some(hours) = &record.hours {
            normal += hours.normal;
            extra += hours.extra;
            discount += hours.discount;
        }
        punched.insert(record.punch_instant.date());
        days.push(day_row(record));
    }

    // Expected days with no punch become absence rows; a leave period
    // supplies the justification when one covers the day.
    for day in expected {
        if punched.contains(day) {
            continue;
        }
        let justification = leaves
            .iter()
            .find(|l| l.contains(*day))
            .map(|l| l.reason.clone());
        days.push(DayRow {
            date: *day,
            entry_time: None,
            exit_time: None,
            normal: None,
            extra: None,
            discount: None,
            justification,
        });
    }

    days.sort_by_key(|row| row.date);

    MonthlyReport {
        header: ReportHeader {
            employee_id: employee.id,
            employee_name: employee.name.clone(),
            registration: employee.registration.clone(),
            shift_type: employee.shift_type,
            unit_name: unit_name.to_string(),
            month,
            year,
        },
        totals: HourTotals::from_components(normal, extra, discount),
        days,
    }
}

/// Builds the monthly report for one employee.
///
/// Fails with `EmptyPeriod` when the employee has no records in the period,
/// so callers can tell "no activity at all" apart from all-zero totals.
pub fn monthly_report(
    store: &dyn PunchStore,
    directory: &dyn Directory,
    calendar: &dyn WorkCalendar,
    employee_id: u64,
    month: u32,
    year: i32,
) -> EngineResult<MonthlyReport> {
    let employee = directory
        .employee(employee_id)?
        .ok_or(EngineError::EmployeeNotFound { id: employee_id })?;
    if !employee.active {
        return Err(EngineError::EmptyPeriod { month, year });
    }
    let unit = directory
        .unit(employee.unit_id)?
        .ok_or(EngineError::UnitNotFound {
            id: employee.unit_id,
        })?;

    let (from, to) = month_instants(month, year)?;
    let records = store.employee_range(employee_id, from, to)?;
    if records.is_empty() {
        return Err(EngineError::EmptyPeriod { month, year });
    }

    let (first, last) = month_bounds(month, year)?;
    let leaves = directory.leaves_overlapping(employee_id, first, last)?;
    let expected = calendar.expected_days(first, last, employee.shift_type, employee.admission_date);

    Ok(assemble_report(
        &employee, &unit.name, &records, &leaves, &expected, month, year,
    ))
}

/// Builds the monthly report for every active employee of a unit.
///
/// Employees with zero punches are included with all-absence rows; the call
/// fails with `EmptyPeriod` only when the whole unit has no records.
pub fn unit_report(
    store: &dyn PunchStore,
    directory: &dyn Directory,
    calendar: &dyn WorkCalendar,
    unit_id: u64,
    month: u32,
    year: i32,
) -> EngineResult<UnitReport> {
    let unit = directory
        .unit(unit_id)?
        .ok_or(EngineError::UnitNotFound { id: unit_id })?;

    let (from, to) = month_instants(month, year)?;
    let (first, last) = month_bounds(month, year)?;

    let mut employees_out = Vec::new();
    let mut any_records = false;

    for employee in directory.employees_of_unit(unit_id)? {
        let records = store.employee_range(employee.id, from, to)?;
        any_records |= !records.is_empty();

        let leaves = directory.leaves_overlapping(employee.id, first, last)?;
        let expected =
            calendar.expected_days(first, last, employee.shift_type, employee.admission_date);
        employees_out.push(assemble_report(
            &employee, &unit.name, &records, &leaves, &expected, month, year,
        ));
    }

    if !any_records {
        return Err(EngineError::EmptyPeriod { month, year });
    }

    Ok(UnitReport {
        unit,
        month,
        year,
        employees: employees_out,
    })
}

/// Lists an employee's punches for a month as denormalized rows.
pub fn employee_month_rows(
    store: &dyn PunchStore,
    directory: &dyn Directory,
    employee_id: u64,
    month: u32,
    year: i32,
) -> EngineResult<Vec<PunchRow>> {
    let employee = directory
        .employee(employee_id)?
        .ok_or(EngineError::EmployeeNotFound { id: employee_id })?;
    let unit = directory
        .unit(employee.unit_id)?
        .ok_or(EngineError::UnitNotFound {
            id: employee.unit_id,
        })?;

    let (from, to) = month_instants(month, year)?;
    let records = store.employee_range(employee_id, from, to)?;
    if records.is_empty() {
        return Err(EngineError::EmptyPeriod { month, year });
    }

    Ok(records
        .iter()
        .map(|record| punch_row(&employee, &unit.name, Some(record)))
        .collect())
}

/// Lists a unit's punches for a month, one row per record, ordered by
/// employee name then date. Employees with zero punches that period appear
/// as a single dateless row.
pub fn unit_month_rows(
    store: &dyn PunchStore,
    directory: &dyn Directory,
    unit_id: u64,
    month: u32,
    year: i32,
) -> EngineResult<Vec<PunchRow>> {
    let unit = directory
        .unit(unit_id)?
        .ok_or(EngineError::UnitNotFound { id: unit_id })?;

    let (from, to) = month_instants(month, year)?;
    let mut rows = Vec::new();

    for employee in directory.employees_of_unit(unit_id)? {
        let records = store.employee_range(employee.id, from, to)?;
        if records.is_empty() {
            rows.push(punch_row(&employee, &unit.name, None));
        } else {
            rows.extend(
                records
                    .iter()
                    .map(|record| punch_row(&employee, &unit.name, Some(record))),
            );
        }
    }

    if rows.is_empty() {
        return Err(EngineError::EmptyPeriod { month, year });
    }
    Ok(rows)
}

/// Lists a unit's punches for one day, most recent first.
pub fn unit_day_rows(
    store: &dyn PunchStore,
    directory: &dyn Directory,
    unit_id: u64,
    date: NaiveDate,
) -> EngineResult<Vec<PunchRow>> {
    let unit = directory
        .unit(unit_id)?
        .ok_or(EngineError::UnitNotFound { id: unit_id })?;

    let from = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let to = (date + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap_or_default();

    let mut records = store.unit_range(unit_id, from, to)?;
    records.sort_by_key(|r| std::cmp::Reverse(r.punch_instant));

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        // Records for employees no longer in the directory are skipped.
        if let Some(employee) = directory.employee(record.employee_id)? {
            rows.push(punch_row(&employee, &unit.name, Some(record)));
        }
    }
    Ok(rows)
}
