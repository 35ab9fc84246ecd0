//! The punch state machine.
//!
//! Per employee the automaton has two states, `NoOpenEntry` and
//! `OpenEntry`. The state itself lives in the ledger's open-entry index;
//! this module decides, for each incoming event, whether it is a new entry,
//! a matching exit, a duplicate or a conflict, and writes to the ledger
//! accordingly. All validation happens before any write, and the
//! write-side invariant checks execute atomically inside the store.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::calculation::split_hours;
use crate::config::{ScheduleBook, ShiftClass};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{Directory, NewPunch, PunchStore};
use crate::models::{
    Employee, PunchEvent, PunchKind, PunchOutcome, PunchRecord, Unit, WorkDuration,
};

/// The punch reconciliation engine.
///
/// Holds injected handles to the punch store, the master-data directory and
/// the schedule table. One instance serves all employees; events for
/// different employees are independent.
pub struct PunchEngine {
    store: Arc<dyn PunchStore>,
    directory: Arc<dyn Directory>,
    schedules: Arc<ScheduleBook>,
}

impl PunchEngine {
    /// Creates an engine from its injected collaborators.
    pub fn new(
        store: Arc<dyn PunchStore>,
        directory: Arc<dyn Directory>,
        schedules: Arc<ScheduleBook>,
    ) -> Self {
        PunchEngine {
            store,
            directory,
            schedules,
        }
    }

    /// The injected punch store.
    pub fn store(&self) -> &Arc<dyn PunchStore> {
        &self.store
    }

    /// The injected master-data directory.
    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    /// The schedule table.
    pub fn schedules(&self) -> &ScheduleBook {
        &self.schedules
    }

    fn employee(&self, id: u64) -> EngineResult<Employee> {
        self.directory
            .employee(id)?
            .ok_or(EngineError::EmployeeNotFound { id })
    }

    fn unit(&self, id: u64) -> EngineResult<Unit> {
        self.directory
            .unit(id)?
            .ok_or(EngineError::UnitNotFound { id })
    }

    /// Records a manual punch event with explicit times.
    ///
    /// Special rotations go through the two-state automaton: an entry-only
    /// event opens an entry (conflicting with any entry already open within
    /// the lookback window), an exit-only event pairs against the most
    /// recent open entry. Standard shifts bypass the automaton and produce
    /// one combined record per day, idempotently.
    pub fn record(&self, event: PunchEvent) -> EngineResult<PunchOutcome> {
        let employee = self.employee(event.employee_id)?;
        let unit = self.unit(event.unit_id)?;

        if event.entry_time.is_none() && event.exit_time.is_none() {
            return Err(EngineError::Validation {
                message: "punch event must carry an entry time, an exit time, or both".to_string(),
            });
        }

        let rule = self.schedules.rule_for(employee.shift_type);
        match rule.pairing {
            ShiftClass::Special => self.record_special(event, employee, unit),
            ShiftClass::Standard => self.record_standard(event, employee, unit),
        }
    }

    fn record_special(
        &self,
        event: PunchEvent,
        employee: Employee,
        unit: Unit,
    ) -> EngineResult<PunchOutcome> {
        if event.entry_time.is_some() && event.exit_time.is_some() {
            return Err(EngineError::Validation {
                message: "special rotation events carry either an entry or an exit, not both"
                    .to_string(),
            });
        }

        let date = event.date.unwrap_or_else(|| Local::now().date_naive());
        let rule = self.schedules.rule_for(employee.shift_type);

        if let Some(entry_time) = event.entry_time {
            let entry_instant = date.and_time(entry_time);
            let window_start = entry_instant - self.schedules.lookback();

            let record = self.store.append_entry_exclusive(
                NewPunch {
                    employee_id: employee.id,
                    unit_id: unit.id,
                    punch_instant: entry_instant,
                    entry: Some(entry_instant),
                    exit: None,
                    biometric_ref: event.biometric_ref,
                    hours: None,
                },
                window_start,
            )?;

            info!(
                employee_id = employee.id,
                unit_id = unit.id,
                instant = %entry_instant,
                "Entry registered"
            );
            return Ok(self.outcome(PunchKind::Entry, record, employee, unit, None, None));
        }

        // Exit-only event: pair against the most recent open entry.
        let exit_time = event.exit_time.unwrap_or_default();
        let exit_instant = event.exit_date.unwrap_or(date).and_time(exit_time);
        let window_start = exit_instant - self.schedules.lookback();

        let paired = self.store.pair_exit(
            NewPunch {
                employee_id: employee.id,
                unit_id: unit.id,
                punch_instant: exit_instant,
                entry: None,
                exit: Some(exit_instant),
                biometric_ref: event.biometric_ref,
                hours: None,
            },
            window_start,
            &|entry_instant| split_hours(entry_instant, exit_instant, rule),
        )?;

        let entry_instant = paired.entry.entry.unwrap_or(paired.entry.punch_instant);
        let elapsed = paired.exit.hours.as_ref().map(|h| h.total);
        info!(
            employee_id = employee.id,
            unit_id = unit.id,
            entry = %entry_instant,
            exit = %exit_instant,
            "Exit paired"
        );
        Ok(self.outcome(
            PunchKind::Exit,
            paired.exit,
            employee,
            unit,
            Some(entry_instant),
            elapsed,
        ))
    }

    fn record_standard(
        &self,
        event: PunchEvent,
        employee: Employee,
        unit: Unit,
    ) -> EngineResult<PunchOutcome> {
        let now = Local::now().naive_local();
        let date = event.date.unwrap_or(now.date());

        // A standard event carries both sides; absent fields default to now.
        let entry_instant = date.and_time(event.entry_time.unwrap_or(now.time()));
        let exit_instant = event
            .exit_date
            .unwrap_or(date)
            .and_time(event.exit_time.unwrap_or(now.time()));

        // Ordering is validated even when upstream supplied the hours.
        if WorkDuration::between(entry_instant, exit_instant).is_none() {
            return Err(EngineError::ExitBeforeEntry {
                entry: entry_instant,
                exit: exit_instant,
            });
        }

        // Hours supplied by an upstream computation are authoritative; the
        // calculator only runs when none were given.
        let rule = self.schedules.rule_for(employee.shift_type);
        let hours = match event.hours {
            Some(hours) => hours,
            None => split_hours(entry_instant, exit_instant, rule)?,
        };

        // The day at midnight is the record's identity; re-submitting the
        // same day returns the stored record instead of duplicating it.
        let punch_instant = date
            .and_hms_opt(0, 0, 0)
            .unwrap_or(entry_instant);

        let (record, created) = self.store.append_idempotent(NewPunch {
            employee_id: employee.id,
            unit_id: unit.id,
            punch_instant,
            entry: Some(entry_instant),
            exit: Some(exit_instant),
            biometric_ref: event.biometric_ref,
            hours: Some(hours),
        })?;

        let kind = if created {
            info!(
                employee_id = employee.id,
                unit_id = unit.id,
                date = %date,
                "Combined record registered"
            );
            PunchKind::Combined
        } else {
            info!(employee_id = employee.id, date = %date, "Duplicate punch ignored");
            PunchKind::Duplicate
        };
        Ok(self.outcome(kind, record, employee, unit, None, None))
    }

    /// Records an auto-direction punch, the kiosk flow: the engine decides
    /// entry vs exit from the automaton state.
    ///
    /// An exit closing its entry within the minimum gap is rejected, and
    /// employees on leave cannot punch at all.
    pub fn clock(
        &self,
        employee_id: u64,
        unit_id: u64,
        at: Option<NaiveDateTime>,
        biometric_ref: Option<String>,
    ) -> EngineResult<PunchOutcome> {
        let employee = self.employee(employee_id)?;
        let unit = self.unit(unit_id)?;
        let at = at.unwrap_or_else(|| Local::now().naive_local());

        if let Some(leave) = self.directory.leave_on(employee.id, at.date())? {
            return Err(EngineError::Validation {
                message: format!(
                    "employee is on {} until {}; punching is blocked",
                    leave.reason, leave.end
                ),
            });
        }

        let rule = self.schedules.rule_for(employee.shift_type);
        match rule.pairing {
            ShiftClass::Special => self.clock_special(employee, unit, at, biometric_ref),
            ShiftClass::Standard => self.clock_standard(employee, unit, at, biometric_ref),
        }
    }

    fn clock_special(
        &self,
        employee: Employee,
        unit: Unit,
        at: NaiveDateTime,
        biometric_ref: Option<String>,
    ) -> EngineResult<PunchOutcome> {
        let window_start = at - self.schedules.lookback();
        let open = self.store.open_entry_since(employee.id, window_start)?;

        let Some(open) = open else {
            let record = self.store.append_entry_exclusive(
                NewPunch {
                    employee_id: employee.id,
                    unit_id: unit.id,
                    punch_instant: at,
                    entry: Some(at),
                    exit: None,
                    biometric_ref,
                    hours: None,
                },
                window_start,
            )?;
            return Ok(self.outcome(PunchKind::Entry, record, employee, unit, None, None));
        };

        let entry_instant = open.entry.unwrap_or(open.punch_instant);
        self.check_min_gap(entry_instant, at)?;

        let rule = self.schedules.rule_for(employee.shift_type);
        let paired = self.store.pair_exit(
            NewPunch {
                employee_id: employee.id,
                unit_id: unit.id,
                punch_instant: at,
                entry: None,
                exit: Some(at),
                biometric_ref,
                hours: None,
            },
            window_start,
            &|entry| split_hours(entry, at, rule),
        )?;

        let elapsed = paired.exit.hours.as_ref().map(|h| h.total);
        Ok(self.outcome(
            PunchKind::Exit,
            paired.exit,
            employee,
            unit,
            Some(entry_instant),
            elapsed,
        ))
    }

    fn clock_standard(
        &self,
        employee: Employee,
        unit: Unit,
        at: NaiveDateTime,
        biometric_ref: Option<String>,
    ) -> EngineResult<PunchOutcome> {
        let today = at.date();
        let latest = self.store.latest_on_day(employee.id, today)?;

        match latest {
            None => {
                // First touch of the day opens the combined record.
                let punch_instant = today.and_hms_opt(0, 0, 0).unwrap_or(at);
                let (record, created) = self.store.append_idempotent(NewPunch {
                    employee_id: employee.id,
                    unit_id: unit.id,
                    punch_instant,
                    entry: Some(at),
                    exit: None,
                    biometric_ref,
                    hours: None,
                })?;
                let kind = if created {
                    PunchKind::Entry
                } else {
                    PunchKind::Duplicate
                };
                Ok(self.outcome(kind, record, employee, unit, None, None))
            }
            Some(record) if record.is_open_entry() => {
                // Second touch completes it.
                let entry_instant = record.entry.unwrap_or(record.punch_instant);
                self.check_min_gap(entry_instant, at)?;

                let rule = self.schedules.rule_for(employee.shift_type);
                let hours = split_hours(entry_instant, at, rule)?;
                let elapsed = hours.total;

                let updated = self
                    .store
                    .update_times(record.id, Some(entry_instant), Some(at), Some(hours))?
                    .ok_or(EngineError::RecordNotFound { id: record.id })?;

                Ok(self.outcome(
                    PunchKind::Exit,
                    updated,
                    employee,
                    unit,
                    Some(entry_instant),
                    Some(elapsed),
                ))
            }
            Some(_) => Err(EngineError::Validation {
                message: format!("exit already registered today ({})", today),
            }),
        }
    }

    fn check_min_gap(&self, entry: NaiveDateTime, exit: NaiveDateTime) -> EngineResult<()> {
        let gap = self.schedules.min_exit_gap();
        if gap.num_minutes() > 0 && exit - entry < gap {
            let remaining = gap.num_minutes() - (exit - entry).num_minutes();
            return Err(EngineError::Validation {
                message: format!(
                    "at least {} minutes must pass between entry and exit; {} minute(s) remaining",
                    gap.num_minutes(),
                    remaining.max(1)
                ),
            });
        }
        Ok(())
    }

    /// Corrects a record's entry and exit times (administrative edit).
    ///
    /// Times are `HH:MM` wall-clock strings; the existing dates of the
    /// record are kept. Derived hours are recomputed and stored.
    pub fn correct(&self, id: u64, entry: &str, exit: &str) -> EngineResult<PunchRecord> {
        let entry_time = crate::calculation::parse_clock(entry)?;
        let exit_time = crate::calculation::parse_clock(exit)?;

        let record = self
            .store
            .get(id)?
            .ok_or(EngineError::RecordNotFound { id })?;
        let employee = self.employee(record.employee_id)?;
        let rule = self.schedules.rule_for(employee.shift_type);

        let entry_date = record
            .entry
            .map(|e| e.date())
            .unwrap_or(record.punch_instant.date());
        let exit_date = record.exit.map(|e| e.date()).unwrap_or(entry_date);

        let entry_instant = entry_date.and_time(entry_time);
        let exit_instant = exit_date.and_time(exit_time);
        let hours = split_hours(entry_instant, exit_instant, rule)?;

        let updated = self
            .store
            .update_times(id, Some(entry_instant), Some(exit_instant), Some(hours))?
            .ok_or(EngineError::RecordNotFound { id })?;

        info!(record_id = id, entry = %entry_instant, exit = %exit_instant, "Record corrected");
        Ok(updated)
    }

    /// Deletes a record by id.
    pub fn remove(&self, id: u64) -> EngineResult<()> {
        if self.store.delete(id)? {
            info!(record_id = id, "Record deleted");
            Ok(())
        } else {
            Err(EngineError::RecordNotFound { id })
        }
    }

    fn outcome(
        &self,
        kind: PunchKind,
        record: PunchRecord,
        employee: Employee,
        unit: Unit,
        paired_entry: Option<NaiveDateTime>,
        elapsed: Option<WorkDuration>,
    ) -> PunchOutcome {
        PunchOutcome {
            kind,
            record,
            employee_name: employee.name,
            unit_name: unit.name,
            shift_type: employee.shift_type,
            paired_entry,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineSettings, ScheduleRule};
    use crate::ledger::{MemoryDirectory, MemoryStore};
    use crate::models::{LeavePeriod, ShiftType};
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::HashMap;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn schedule_book() -> ScheduleBook {
        let mut schedules = HashMap::new();
        schedules.insert(
            "8h".to_string(),
            ScheduleRule {
                pairing: ShiftClass::Standard,
                end_hour: 17,
            },
        );
        schedules.insert(
            "12x36".to_string(),
            ScheduleRule {
                pairing: ShiftClass::Special,
                end_hour: 19,
            },
        );
        schedules.insert(
            "24x72".to_string(),
            ScheduleRule {
                pairing: ShiftClass::Special,
                end_hour: 31,
            },
        );
        ScheduleBook::from_parts(schedules, EngineSettings::default())
    }

    fn engine_with(employees: Vec<Employee>) -> (PunchEngine, Arc<MemoryDirectory>) {
        let directory = Arc::new(MemoryDirectory::new());
        directory
            .upsert_unit(Unit {
                id: 1,
                name: "Central Health Post".to_string(),
            })
            .unwrap();
        for employee in employees {
            directory.upsert_employee(employee).unwrap();
        }

        let engine = PunchEngine::new(
            Arc::new(MemoryStore::new()),
            directory.clone(),
            Arc::new(schedule_book()),
        );
        (engine, directory)
    }

    fn rotation_employee(id: u64) -> Employee {
        Employee {
            id,
            name: "Jose Santos".to_string(),
            registration: "20250042".to_string(),
            unit_id: 1,
            shift_type: ShiftType::TwentyFourBySeventyTwo,
            admission_date: make_date("2020-02-01"),
            active: true,
        }
    }

    fn standard_employee(id: u64) -> Employee {
        Employee {
            id,
            name: "Maria Souza".to_string(),
            registration: "20250011".to_string(),
            unit_id: 1,
            shift_type: ShiftType::EightHour,
            admission_date: make_date("2021-03-15"),
            active: true,
        }
    }

    fn entry_event(employee_id: u64, date: &str, time: &str) -> PunchEvent {
        PunchEvent {
            employee_id,
            unit_id: 1,
            date: Some(make_date(date)),
            entry_time: Some(make_time(time)),
            exit_time: None,
            exit_date: None,
            biometric_ref: None,
            hours: None,
        }
    }

    fn exit_event(employee_id: u64, date: &str, time: &str) -> PunchEvent {
        PunchEvent {
            employee_id,
            unit_id: 1,
            date: Some(make_date(date)),
            entry_time: None,
            exit_time: Some(make_time(time)),
            exit_date: None,
            biometric_ref: None,
            hours: None,
        }
    }

    #[test]
    fn test_entry_then_exit_pairs_with_exact_elapsed() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);

        let entry = engine.record(entry_event(1, "2025-06-19", "08:00:00")).unwrap();
        assert_eq!(entry.kind, PunchKind::Entry);
        assert!(entry.record.is_open_entry());

        let exit = engine.record(exit_event(1, "2025-06-20", "08:00:00")).unwrap();
        assert_eq!(exit.kind, PunchKind::Exit);
        assert_eq!(exit.paired_entry, Some(make_datetime("2025-06-19 08:00:00")));
        assert_eq!(exit.elapsed, Some(WorkDuration::from_hms(24, 0, 0)));

        // 24x72 threshold is 31h after entry-day midnight: 23h normal, 1h extra.
        let hours = exit.record.hours.unwrap();
        assert_eq!(hours.normal, WorkDuration::from_hms(23, 0, 0));
        assert_eq!(hours.extra, WorkDuration::from_hms(1, 0, 0));
    }

    #[test]
    fn test_second_entry_while_open_is_a_conflict_referencing_the_first() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);
        engine.record(entry_event(1, "2025-06-19", "08:00:00")).unwrap();

        let result = engine.record(entry_event(1, "2025-06-19", "08:05:00"));
        match result {
            Err(EngineError::OpenEntryConflict { opened_at }) => {
                assert_eq!(opened_at, make_datetime("2025-06-19 08:00:00"));
                assert!(
                    EngineError::OpenEntryConflict { opened_at }
                        .to_string()
                        .contains("2025-06-19 08:00")
                );
            }
            other => panic!("Expected OpenEntryConflict, got {:?}", other),
        }

        // No record was created by the rejected event.
        let records = engine
            .store()
            .employee_range(
                1,
                make_datetime("2025-06-01 00:00:00"),
                make_datetime("2025-07-01 00:00:00"),
            )
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_exit_without_open_entry_is_rejected_without_writing() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);

        let result = engine.record(exit_event(1, "2025-06-20", "08:00:00"));
        assert!(matches!(result, Err(EngineError::NoOpenEntry { employee_id: 1 })));

        let records = engine
            .store()
            .employee_range(
                1,
                make_datetime("2025-06-01 00:00:00"),
                make_datetime("2025-07-01 00:00:00"),
            )
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_exit_outside_lookback_window_finds_nothing() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);
        engine.record(entry_event(1, "2025-06-10", "08:00:00")).unwrap();

        // Default lookback is 3 days; the open entry is 9 days old.
        let result = engine.record(exit_event(1, "2025-06-19", "08:00:00"));
        assert!(matches!(result, Err(EngineError::NoOpenEntry { .. })));
    }

    #[test]
    fn test_exit_before_entry_is_a_validation_failure() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);
        engine.record(entry_event(1, "2025-06-19", "08:00:00")).unwrap();

        let result = engine.record(exit_event(1, "2025-06-19", "07:00:00"));
        assert!(matches!(result, Err(EngineError::ExitBeforeEntry { .. })));

        // The entry is still open afterwards.
        let exit = engine.record(exit_event(1, "2025-06-20", "08:00:00")).unwrap();
        assert_eq!(exit.kind, PunchKind::Exit);
    }

    #[test]
    fn test_special_event_with_both_sides_is_rejected() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.exit_time = Some(make_time("17:00:00"));

        assert!(matches!(
            engine.record(event),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_event_with_no_times_is_rejected() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let event = PunchEvent {
            employee_id: 1,
            unit_id: 1,
            date: Some(make_date("2025-06-19")),
            entry_time: None,
            exit_time: None,
            exit_date: None,
            biometric_ref: None,
            hours: None,
        };
        assert!(matches!(
            engine.record(event),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_supplied_hours_are_stored_as_authoritative() {
        use crate::models::HoursBreakdown;

        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.exit_time = Some(make_time("19:00:00"));
        event.hours = Some(HoursBreakdown {
            total: WorkDuration::from_hms(11, 0, 0),
            normal: WorkDuration::from_hms(11, 0, 0),
            extra: WorkDuration::ZERO,
            discount: WorkDuration::ZERO,
            justification: None,
        });

        let outcome = engine.record(event).unwrap();

        // The calculator would have split 9h/2h; the supplied values win.
        let hours = outcome.record.hours.unwrap();
        assert_eq!(hours.normal, WorkDuration::from_hms(11, 0, 0));
        assert_eq!(hours.extra, WorkDuration::ZERO);
    }

    #[test]
    fn test_supplied_hours_do_not_bypass_ordering_validation() {
        use crate::models::HoursBreakdown;

        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let mut event = entry_event(1, "2025-06-19", "17:00:00");
        event.exit_time = Some(make_time("08:00:00"));
        event.hours = Some(HoursBreakdown {
            total: WorkDuration::from_hms(9, 0, 0),
            normal: WorkDuration::from_hms(9, 0, 0),
            extra: WorkDuration::ZERO,
            discount: WorkDuration::ZERO,
            justification: None,
        });

        assert!(matches!(
            engine.record(event),
            Err(EngineError::ExitBeforeEntry { .. })
        ));
    }

    #[test]
    fn test_standard_event_creates_one_combined_record() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.exit_time = Some(make_time("19:00:00"));

        let outcome = engine.record(event).unwrap();
        assert_eq!(outcome.kind, PunchKind::Combined);

        let hours = outcome.record.hours.unwrap();
        assert_eq!(hours.normal, WorkDuration::from_hms(9, 0, 0));
        assert_eq!(hours.extra, WorkDuration::from_hms(2, 0, 0));
        assert_eq!(hours.justification.as_deref(), Some("overtime"));
    }

    #[test]
    fn test_standard_resubmission_is_idempotent() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.exit_time = Some(make_time("17:00:00"));

        let first = engine.record(event.clone()).unwrap();
        let second = engine.record(event).unwrap();

        assert_eq!(first.kind, PunchKind::Combined);
        assert_eq!(second.kind, PunchKind::Duplicate);
        assert_eq!(first.record.id, second.record.id);

        let records = engine
            .store()
            .employee_range(
                1,
                make_datetime("2025-06-01 00:00:00"),
                make_datetime("2025-07-01 00:00:00"),
            )
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_unknown_employee_and_unit_are_not_found() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        assert!(matches!(
            engine.record(entry_event(99, "2025-06-19", "08:00:00")),
            Err(EngineError::EmployeeNotFound { id: 99 })
        ));

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.unit_id = 42;
        assert!(matches!(
            engine.record(event),
            Err(EngineError::UnitNotFound { id: 42 })
        ));
    }

    #[test]
    fn test_unknown_shift_code_falls_back_to_standard_pairing() {
        let mut employee = standard_employee(1);
        employee.shift_type = ShiftType::Unknown;
        let (engine, _) = engine_with(vec![employee]);

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.exit_time = Some(make_time("17:00:00"));

        let outcome = engine.record(event).unwrap();
        assert_eq!(outcome.kind, PunchKind::Combined);
        assert_eq!(
            outcome.record.hours.unwrap().normal,
            WorkDuration::from_hms(9, 0, 0)
        );
    }

    #[test]
    fn test_clock_special_alternates_entry_and_exit() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);

        let entry = engine
            .clock(1, 1, Some(make_datetime("2025-06-19 08:00:00")), None)
            .unwrap();
        assert_eq!(entry.kind, PunchKind::Entry);

        let exit = engine
            .clock(1, 1, Some(make_datetime("2025-06-20 08:00:00")), None)
            .unwrap();
        assert_eq!(exit.kind, PunchKind::Exit);
        assert_eq!(exit.elapsed, Some(WorkDuration::from_hms(24, 0, 0)));

        let next = engine
            .clock(1, 1, Some(make_datetime("2025-06-21 08:00:00")), None)
            .unwrap();
        assert_eq!(next.kind, PunchKind::Entry);
    }

    #[test]
    fn test_clock_exit_within_minimum_gap_is_blocked() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);

        engine
            .clock(1, 1, Some(make_datetime("2025-06-19 08:00:00")), None)
            .unwrap();
        let result = engine.clock(1, 1, Some(make_datetime("2025-06-19 08:02:00")), None);

        match result {
            Err(EngineError::Validation { message }) => {
                assert!(message.contains("minute"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }

        // Still open: a later clock closes it.
        let exit = engine
            .clock(1, 1, Some(make_datetime("2025-06-20 08:00:00")), None)
            .unwrap();
        assert_eq!(exit.kind, PunchKind::Exit);
    }

    #[test]
    fn test_clock_standard_opens_then_completes_the_day() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let entry = engine
            .clock(1, 1, Some(make_datetime("2025-06-19 08:00:00")), None)
            .unwrap();
        assert_eq!(entry.kind, PunchKind::Entry);
        assert!(entry.record.is_open_entry());

        let exit = engine
            .clock(1, 1, Some(make_datetime("2025-06-19 17:00:00")), None)
            .unwrap();
        assert_eq!(exit.kind, PunchKind::Exit);
        assert_eq!(exit.record.id, entry.record.id);
        assert_eq!(
            exit.record.hours.as_ref().unwrap().normal,
            WorkDuration::from_hms(9, 0, 0)
        );

        let third = engine.clock(1, 1, Some(make_datetime("2025-06-19 18:00:00")), None);
        assert!(matches!(third, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_clock_is_blocked_during_leave() {
        let (engine, directory) = engine_with(vec![standard_employee(1)]);
        directory
            .add_leave(
                1,
                LeavePeriod {
                    start: make_date("2025-06-10"),
                    end: make_date("2025-06-25"),
                    reason: "vacation".to_string(),
                },
            )
            .unwrap();

        let result = engine.clock(1, 1, Some(make_datetime("2025-06-19 08:00:00")), None);
        match result {
            Err(EngineError::Validation { message }) => {
                assert!(message.contains("vacation"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_correct_revalidates_ordering_and_recomputes_hours() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        let mut event = entry_event(1, "2025-06-19", "08:00:00");
        event.exit_time = Some(make_time("17:00:00"));
        let outcome = engine.record(event).unwrap();

        let updated = engine.correct(outcome.record.id, "09:00", "19:00").unwrap();
        assert_eq!(updated.entry, Some(make_datetime("2025-06-19 09:00:00")));
        assert_eq!(updated.exit, Some(make_datetime("2025-06-19 19:00:00")));

        // Entry 09:00, scheduled end 17:00: 8h normal, 2h extra.
        let hours = updated.hours.unwrap();
        assert_eq!(hours.normal, WorkDuration::from_hms(8, 0, 0));
        assert_eq!(hours.extra, WorkDuration::from_hms(2, 0, 0));

        assert!(matches!(
            engine.correct(outcome.record.id, "19:00", "09:00"),
            Err(EngineError::ExitBeforeEntry { .. })
        ));
    }

    #[test]
    fn test_correct_rejects_malformed_times() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);

        assert!(matches!(
            engine.correct(1, "9am", "17:00"),
            Err(EngineError::InvalidTime { .. })
        ));
        assert!(matches!(
            engine.correct(1, "09:00", "25:61"),
            Err(EngineError::InvalidTime { .. })
        ));
    }

    #[test]
    fn test_correct_unknown_record_is_not_found() {
        let (engine, _) = engine_with(vec![standard_employee(1)]);
        assert!(matches!(
            engine.correct(404, "09:00", "17:00"),
            Err(EngineError::RecordNotFound { id: 404 })
        ));
    }

    #[test]
    fn test_remove_deletes_once() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);
        let outcome = engine.record(entry_event(1, "2025-06-19", "08:00:00")).unwrap();

        engine.remove(outcome.record.id).unwrap();
        assert!(matches!(
            engine.remove(outcome.record.id),
            Err(EngineError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_deleting_open_entry_reopens_the_automaton() {
        let (engine, _) = engine_with(vec![rotation_employee(1)]);
        let outcome = engine.record(entry_event(1, "2025-06-19", "08:00:00")).unwrap();
        engine.remove(outcome.record.id).unwrap();

        // With the open entry gone, a fresh entry is accepted.
        let entry = engine.record(entry_event(1, "2025-06-19", "09:00:00")).unwrap();
        assert_eq!(entry.kind, PunchKind::Entry);
    }
}
