//! Punch ledger and master-data access.
//!
//! The ledger is the append-only system of record for punches, exposed as
//! the [`PunchStore`] trait and injected into the engine at construction
//! time. [`Directory`] provides read-only employee/unit/leave master data
//! owned by external collaborators.

mod directory;
mod memory;
mod store;

pub use directory::{Directory, MemoryDirectory};
pub use memory::MemoryStore;
pub use store::{NewPunch, PairedExit, PunchStore};
