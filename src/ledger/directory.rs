//! Employee and unit directory.
//!
//! Master data is owned by the out-of-scope CRUD collaborators; the engine
//! reads it through the [`Directory`] trait. The in-memory implementation
//! backs tests and single-process deployments.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeavePeriod, Unit};

/// Read-only access to employee, unit and leave master data.
pub trait Directory: Send + Sync {
    /// Looks up an employee by id.
    fn employee(&self, id: u64) -> EngineResult<Option<Employee>>;

    /// Looks up a unit by id.
    fn unit(&self, id: u64) -> EngineResult<Option<Unit>>;

    /// Returns a unit's active employees, ordered by name.
    fn employees_of_unit(&self, unit_id: u64) -> EngineResult<Vec<Employee>>;

    /// Returns the leave period covering `date` for an employee, if any.
    fn leave_on(&self, employee_id: u64, date: NaiveDate) -> EngineResult<Option<LeavePeriod>>;

    /// Returns an employee's leave periods overlapping `[start, end]`.
    fn leaves_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeavePeriod>>;
}

#[derive(Default)]
struct Inner {
    employees: HashMap<u64, Employee>,
    units: HashMap<u64, Unit>,
    leaves: HashMap<u64, Vec<LeavePeriod>>,
}

/// An in-memory [`Directory`] implementation.
#[derive(Default)]
pub struct MemoryDirectory {
    inner: RwLock<Inner>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        MemoryDirectory::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| EngineError::Storage {
            message: "directory lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| EngineError::Storage {
            message: "directory lock poisoned".to_string(),
        })
    }

    /// Adds or replaces an employee.
    pub fn upsert_employee(&self, employee: Employee) -> EngineResult<()> {
        self.write()?.employees.insert(employee.id, employee);
        Ok(())
    }

    /// Adds or replaces a unit.
    pub fn upsert_unit(&self, unit: Unit) -> EngineResult<()> {
        self.write()?.units.insert(unit.id, unit);
        Ok(())
    }

    /// Registers a leave period for an employee.
    pub fn add_leave(&self, employee_id: u64, leave: LeavePeriod) -> EngineResult<()> {
        self.write()?.leaves.entry(employee_id).or_default().push(leave);
        Ok(())
    }
}

impl Directory for MemoryDirectory {
    fn employee(&self, id: u64) -> EngineResult<Option<Employee>> {
        Ok(self.read()?.employees.get(&id).cloned())
    }

    fn unit(&self, id: u64) -> EngineResult<Option<Unit>> {
        Ok(self.read()?.units.get(&id).cloned())
    }

    fn employees_of_unit(&self, unit_id: u64) -> EngineResult<Vec<Employee>> {
        let inner = self.read()?;
        let mut employees: Vec<Employee> = inner
            .employees
            .values()
            .filter(|e| e.unit_id == unit_id && e.active)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(employees)
    }

    fn leave_on(&self, employee_id: u64, date: NaiveDate) -> EngineResult<Option<LeavePeriod>> {
        let inner = self.read()?;
        Ok(inner
            .leaves
            .get(&employee_id)
            .and_then(|leaves| leaves.iter().find(|l| l.contains(date)))
            .cloned())
    }

    fn leaves_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<LeavePeriod>> {
        let inner = self.read()?;
        Ok(inner
            .leaves
            .get(&employee_id)
            .map(|leaves| {
                leaves
                    .iter()
                    .filter(|l| l.start <= end && l.end >= start)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
