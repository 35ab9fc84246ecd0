//! The punch store trait.
//!
//! The ledger is the append-only system of record for punches. It is
//! injected into the engine as a handle with an explicit lifecycle, never
//! imported as a process-wide singleton.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::EngineResult;
use crate::models::{HoursBreakdown, PunchRecord};

/// The fields of a punch record before the store assigns identity and
/// audit timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPunch {
    /// The employee that punched.
    pub employee_id: u64,
    /// The unit the punch was registered at.
    pub unit_id: u64,
    /// The combined timestamp of the event.
    pub punch_instant: NaiveDateTime,
    /// Entry date/time, when this row carries an entry.
    pub entry: Option<NaiveDateTime>,
    /// Exit date/time, when this row carries an exit.
    pub exit: Option<NaiveDateTime>,
    /// Opaque biometric reference.
    pub biometric_ref: Option<String>,
    /// Derived hour components, when already computed.
    pub hours: Option<HoursBreakdown>,
}

/// An exit row paired against the open entry it closed.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedExit {
    /// The exit record that was appended.
    pub exit: PunchRecord,
    /// The entry record the exit was paired against.
    pub entry: PunchRecord,
}

/// Append-only storage for punch records.
///
/// Implementations must make the open-entry operations atomic: the
/// "check for open entry, then insert" sequence executes under one
/// critical section, and an invariant violation surfaces as a typed error
/// rather than a second open row. Events for different employees are
/// independent and may run in parallel.
pub trait PunchStore: Send + Sync {
    /// Appends a record unconditionally.
    fn append(&self, punch: NewPunch) -> EngineResult<PunchRecord>;

    /// Appends an entry row, failing with `OpenEntryConflict` when the
    /// employee already has an open entry at or after `window_start`.
    ///
    /// The existence check and the insert happen atomically.
    fn append_entry_exclusive(
        &self,
        punch: NewPunch,
        window_start: NaiveDateTime,
    ) -> EngineResult<PunchRecord>;

    /// Pairs an exit against the most recent open entry at or after
    /// `window_start`, atomically: the entry is located, `compute_hours` is
    /// evaluated with its entry instant, the exit row (carrying those
    /// hours) is appended and the entry leaves the open set. If there is no
    /// open entry the call fails with `NoOpenEntry`; if `compute_hours`
    /// fails nothing is written.
    fn pair_exit(
        &self,
        punch: NewPunch,
        window_start: NaiveDateTime,
        compute_hours: &dyn Fn(NaiveDateTime) -> EngineResult<HoursBreakdown>,
    ) -> EngineResult<PairedExit>;

    /// Appends a record unless one already exists for the same employee and
    /// punch instant; returns the record and whether it was created.
    fn append_idempotent(&self, punch: NewPunch) -> EngineResult<(PunchRecord, bool)>;

    /// Returns the employee's most recent open entry at or after
    /// `window_start`.
    fn open_entry_since(
        &self,
        employee_id: u64,
        window_start: NaiveDateTime,
    ) -> EngineResult<Option<PunchRecord>>;

    /// Returns the employee's most recent record on the given day.
    fn latest_on_day(&self, employee_id: u64, date: NaiveDate)
    -> EngineResult<Option<PunchRecord>>;

    /// Fetches a record by id.
    fn get(&self, id: u64) -> EngineResult<Option<PunchRecord>>;

    /// Replaces a record's entry/exit instants and derived hours. Returns
    /// the updated record, or `None` when the id is unknown.
    fn update_times(
        &self,
        id: u64,
        entry: Option<NaiveDateTime>,
        exit: Option<NaiveDateTime>,
        hours: Option<HoursBreakdown>,
    ) -> EngineResult<Option<PunchRecord>>;

    /// Deletes a record by id; returns whether anything was removed.
    fn delete(&self, id: u64) -> EngineResult<bool>;

    /// Returns the employee's records with `punch_instant` in
    /// `[from, to)`, in ascending instant order.
    fn employee_range(
        &self,
        employee_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> EngineResult<Vec<PunchRecord>>;

    /// Returns the unit's records with `punch_instant` in `[from, to)`, in
    /// ascending instant order.
    fn unit_range(
        &self,
        unit_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> EngineResult<Vec<PunchRecord>>;
}
