//! Punch records and punch events.
//!
//! A [`PunchRecord`] is one row of the append-only ledger. For standard
//! shifts a single record carries both entry and exit; for special rotations
//! entry and exit are independent rows paired by the state machine at write
//! time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::duration::WorkDuration;
use super::employee::ShiftType;

/// Derived hour components stored on a record once computed.
///
/// Computed at creation or correction time and persisted; never re-derived
/// lazily on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreakdown {
    /// Total worked time for the pair.
    pub total: WorkDuration,
    /// Worked time within the scheduled duration.
    pub normal: WorkDuration,
    /// Worked time beyond the scheduled duration.
    pub extra: WorkDuration,
    /// Scheduled-but-not-worked time.
    pub discount: WorkDuration,
    /// Label attached when extra hours are non-zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// One row of the punch ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// Unique identifier for the record.
    pub id: u64,
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
    /// Opaque biometric reference from the capture device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biometric_ref: Option<String>,
    /// Derived hour components, once computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<HoursBreakdown>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PunchRecord {
    /// Returns true when this row is an entry with no exit yet.
    pub fn is_open_entry(&self) -> bool {
        self.entry.is_some() && self.exit.is_none()
    }
}

/// An incoming punch event, before reconciliation.
///
/// At least one of `entry_time`/`exit_time` must be set for a manual event;
/// the auto-direction clock flow builds events itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// The employee that punched.
    pub employee_id: u64,
    /// The unit the punch was registered at.
    pub unit_id: u64,
    /// The date of the event; defaults to the entry instant's date.
    pub date: Option<NaiveDate>,
    /// Entry wall-clock time, when the event carries an entry.
    pub entry_time: Option<NaiveTime>,
    /// Exit wall-clock time, when the event carries an exit.
    pub exit_time: Option<NaiveTime>,
    /// Date of the exit when it falls on a different day than `date`.
    pub exit_date: Option<NaiveDate>,
    /// Opaque biometric reference from the capture device.
    pub biometric_ref: Option<String>,
    /// Pre-computed hour components from an upstream system.
    ///
    /// Only honoured for standard combined records; when present they are
    /// stored as authoritative instead of being recomputed.
    pub hours: Option<HoursBreakdown>,
}

/// How a punch event was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    /// A new open entry for a special rotation.
    Entry,
    /// An exit paired against an open entry.
    Exit,
    /// A combined standard-shift record.
    Combined,
    /// A re-submitted standard event; the stored record was returned.
    Duplicate,
}

/// The result of reconciling one punch event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchOutcome {
    /// How the event was reconciled.
    pub kind: PunchKind,
    /// The record created (or, for duplicates, the existing one).
    pub record: PunchRecord,
    /// Denormalized employee name.
    pub employee_name: String,
    /// Denormalized unit name.
    pub unit_name: String,
    /// The employee's shift type.
    pub shift_type: ShiftType,
    /// The paired entry's instant, set when an exit was matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paired_entry: Option<NaiveDateTime>,
    /// Elapsed worked time, set when an exit was matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<WorkDuration>,
}
