//! In-memory punch store.
//!
//! A single mutex guards the whole ledger, so every trait operation is one
//! critical section and the open-entry invariant cannot be violated by
//! concurrent entry punches. An index keyed by employee id gives O(1)
//! access to open entries instead of a windowed scan.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{HoursBreakdown, PunchRecord};

use super::store::{NewPunch, PairedExit, PunchStore};

#[derive(Default)]
struct Inner {
    next_id: u64,
    records: BTreeMap<u64, PunchRecord>,
    /// Open entry record ids per employee, in insertion (ascending instant)
    /// order. Pairing an exit removes the entry from this set; the row
    /// itself is never rewritten.
    open_entries: HashMap<u64, Vec<u64>>,
    /// Record id per (employee, punch instant), for idempotent appends.
    by_instant: HashMap<(u64, NaiveDateTime), u64>,
}

impl Inner {
    fn insert(&mut self, punch: NewPunch) -> PunchRecord {
        self.next_id += 1;
        let now = Utc::now();
        let record = PunchRecord {
            id: self.next_id,
            employee_id: punch.employee_id,
            unit_id: punch.unit_id,
            punch_instant: punch.punch_instant,
            entry: punch.entry,
            exit: punch.exit,
            biometric_ref: punch.biometric_ref,
            hours: punch.hours,
            created_at: now,
            updated_at: now,
        };

        if record.is_open_entry() {
            self.open_entries
                .entry(record.employee_id)
                .or_default()
                .push(record.id);
        }
        self.by_instant
            .insert((record.employee_id, record.punch_instant), record.id);
        self.records.insert(record.id, record.clone());
        record
    }

    /// The employee's most recent open entry at or after `window_start`.
    fn open_entry_since(&self, employee_id: u64, window_start: NaiveDateTime) -> Option<&PunchRecord> {
        self.open_entries
            .get(&employee_id)?
            .iter()
            .rev()
            .filter_map(|id| self.records.get(id))
            .find(|record| record.punch_instant >= window_start)
    }

    fn drop_open_entry(&mut self, employee_id: u64, record_id: u64) {
        if let Some(ids) = self.open_entries.get_mut(&employee_id) {
            ids.retain(|id| *id != record_id);
            if ids.is_empty() {
                self.open_entries.remove(&employee_id);
            }
        }
    }
}

/// An in-memory [`PunchStore`] implementation.
///
/// Opened at startup by constructing it and closed at shutdown by dropping
/// it; the engine receives it as an injected handle.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| EngineError::Storage {
            message: "punch store mutex poisoned".to_string(),
        })
    }
}

impl PunchStore for MemoryStore {
    fn append(&self, punch: NewPunch) -> EngineResult<PunchRecord> {
        Ok(self.lock()?.insert(punch))
    }

    fn append_entry_exclusive(
        &self,
        punch: NewPunch,
        window_start: NaiveDateTime,
    ) -> EngineResult<PunchRecord> {
        let mut inner = self.lock()?;

        if let Some(open) = inner.open_entry_since(punch.employee_id, window_start) {
            let opened_at = open.entry.unwrap_or(open.punch_instant);
            return Err(EngineError::OpenEntryConflict { opened_at });
        }

        Ok(inner.insert(punch))
    }

    fn pair_exit(
        &self,
        punch: NewPunch,
        window_start: NaiveDateTime,
        compute_hours: &dyn Fn(NaiveDateTime) -> EngineResult<HoursBreakdown>,
    ) -> EngineResult<PairedExit> {
        let mut inner = self.lock()?;

        let entry = inner
            .open_entry_since(punch.employee_id, window_start)
            .cloned()
            .ok_or(EngineError::NoOpenEntry {
                employee_id: punch.employee_id,
            })?;
        let entry_instant = entry.entry.unwrap_or(entry.punch_instant);

        // Nothing is written if the hours computation rejects the pair.
        let hours = compute_hours(entry_instant)?;

        let exit = inner.insert(NewPunch {
            hours: Some(hours),
            ..punch
        });
        inner.drop_open_entry(entry.employee_id, entry.id);

        Ok(PairedExit { exit, entry })
    }

    fn append_idempotent(&self, punch: NewPunch) -> EngineResult<(PunchRecord, bool)> {
        let mut inner = self.lock()?;

        let key = (punch.employee_id, punch.punch_instant);
        if let Some(existing) = inner.by_instant.get(&key).and_then(|id| inner.records.get(id)) {
            return Ok((existing.clone(), false));
        }

        Ok((inner.insert(punch), true))
    }

    fn open_entry_since(
        &self,
        employee_id: u64,
        window_start: NaiveDateTime,
    ) -> EngineResult<Option<PunchRecord>> {
        Ok(self.lock()?.open_entry_since(employee_id, window_start).cloned())
    }

    fn latest_on_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> EngineResult<Option<PunchRecord>> {
        let inner = self.lock()?;
        Ok(inner
            .records
            .values()
            .filter(|r| r.employee_id == employee_id && r.punch_instant.date() == date)
            .max_by_key(|r| r.punch_instant)
            .cloned())
    }

    fn get(&self, id: u64) -> EngineResult<Option<PunchRecord>> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    fn update_times(
        &self,
        id: u64,
        entry: Option<NaiveDateTime>,
        exit: Option<NaiveDateTime>,
        hours: Option<HoursBreakdown>,
    ) -> EngineResult<Option<PunchRecord>> {
        let mut inner = self.lock()?;

        let Some(record) = inner.records.get_mut(&id) else {
            return Ok(None);
        };

        let was_open = record.is_open_entry();
        record.entry = entry;
        record.exit = exit;
        record.hours = hours;
        record.updated_at = Utc::now();
        let updated = record.clone();

        // Keep the open-entry index in step with the corrected row.
        if was_open && !updated.is_open_entry() {
            inner.drop_open_entry(updated.employee_id, id);
        } else if !was_open && updated.is_open_entry() {
            inner
                .open_entries
                .entry(updated.employee_id)
                .or_default()
                .push(id);
        }

        Ok(Some(updated))
    }

    fn delete(&self, id: u64) -> EngineResult<bool> {
        let mut inner = self.lock()?;

        let Some(record) = inner.records.remove(&id) else {
            return Ok(false);
        };

        inner.drop_open_entry(record.employee_id, id);
        inner
            .by_instant
            .remove(&(record.employee_id, record.punch_instant));
        Ok(true)
    }

    fn employee_range(
        &self,
        employee_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> EngineResult<Vec<PunchRecord>> {
        let inner = self.lock()?;
        let mut records: Vec<PunchRecord> = inner
            .records
            .values()
            .filter(|r| {
                r.employee_id == employee_id && r.punch_instant >= from && r.punch_instant < to
            })
            .cloned()
            .collect();
        records.sort_by_key(|r| r.punch_instant);
        Ok(records)
    }

    fn unit_range(
        &self,
        unit_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> EngineResult<Vec<PunchRecord>> {
        let inner = self.lock()?;
        let mut records: Vec<PunchRecord> = inner
            .records
            .values()
            .filter(|r| r.unit_id == unit_id && r.punch_instant >= from && r.punch_instant < to)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.punch_instant);
        Ok(records)
    }
}
