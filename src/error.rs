//! Error types for the punch reconciliation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording punches and
//! computing hour totals.

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for the punch reconciliation engine.
///
/// Variants fall into four machine-distinguishable kinds: not-found,
/// conflict, validation and internal. The HTTP layer maps each kind to a
/// status code in `api::response`.
///
/// # Example
///
/// ```
/// use punch_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound { id: 42 };
/// assert_eq!(error.to_string(), "Employee not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        id: u64,
    },

    /// No unit exists with the given id.
    #[error("Unit not found: {id}")]
    UnitNotFound {
        /// The unit id that was not found.
        id: u64,
    },

    /// No punch record exists with the given id.
    #[error("Punch record not found: {id}")]
    RecordNotFound {
        /// The record id that was not found.
        id: u64,
    },

    /// An entry punch arrived while another entry is still open.
    #[error("An open entry already exists, registered at {opened_at}")]
    OpenEntryConflict {
        /// When the existing open entry was registered.
        opened_at: NaiveDateTime,
    },

    /// An exit punch arrived with no open entry to pair against.
    #[error("No open entry found for employee {employee_id} within the lookback window")]
    NoOpenEntry {
        /// The employee whose exit could not be paired.
        employee_id: u64,
    },

    /// No punch records matched the requested period.
    #[error("No punch records found for {month:02}/{year}")]
    EmptyPeriod {
        /// The requested month (1-12).
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// An exit instant that is not strictly after its entry.
    #[error("Exit time {exit} must be after entry time {entry}")]
    ExitBeforeEntry {
        /// The entry instant of the pair.
        entry: NaiveDateTime,
        /// The offending exit instant.
        exit: NaiveDateTime,
    },

    /// A time string that does not match the expected format.
    #[error("Invalid time '{value}': expected {expected}")]
    InvalidTime {
        /// The value that failed to parse.
        value: String,
        /// The format that was expected (e.g. "HH:MM").
        expected: String,
    },

    /// A punch event that fails a validation rule before any write.
    #[error("Validation failed: {message}")]
    Validation {
        /// A description of the validation failure.
        message: String,
    },

    /// The storage layer failed in an unexpected way.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors that report an absent entity or period.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::EmployeeNotFound { .. }
                | EngineError::UnitNotFound { .. }
                | EngineError::RecordNotFound { .. }
                | EngineError::NoOpenEntry { .. }
                | EngineError::EmptyPeriod { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
