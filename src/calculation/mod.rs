//! Duration and hours calculation for the punch reconciliation engine.
//!
//! This module computes elapsed worked time for a matched entry/exit pair
//! and splits it into normal, extra and discount components using the
//! scheduled-end threshold from the shift schedule table.

mod hours;

pub use hours::{OVERTIME_LABEL, parse_clock, scheduled_end, split_hours};
