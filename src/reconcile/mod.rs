//! Punch reconciliation: the per-employee entry/exit state machine.
//!
//! This module decides, for each incoming punch event, whether it is a
//! valid new entry, a matching exit, a duplicate or a conflict, and writes
//! to the ledger accordingly.

mod engine;

pub use engine::PunchEngine;
