//! Shift schedule configuration for the punch reconciliation engine.
//!
//! This module loads the shift-type table from YAML files: the pairing
//! class (standard vs special) and the scheduled-end rule for each code,
//! plus the engine settings (lookback window, minimum exit gap).
//!
//! # Example
//!
//! ```no_run
//! use punch_engine::config::ScheduleBook;
//! use punch_engine::models::ShiftType;
//!
//! let book = ScheduleBook::load("./config/default").unwrap();
//! println!("8h pairing: {}", book.classify(ShiftType::EightHour));
//! ```

mod loader;
mod types;

pub use loader::ScheduleBook;
pub use types::{EngineSettings, ScheduleFile, ScheduleRule, ShiftClass};
