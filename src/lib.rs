//! Punch Reconciliation & Hours Computation Engine
//!
//! This crate records employee clock-in/clock-out events ("punches") for a
//! municipal workforce and derives payroll-relevant hour totals per
//! employee per period: it decides whether an incoming punch is an entry or
//! an exit, matches exits to open entries across shift types with different
//! pairing rules, prevents double-open entries, and converts raw timestamps
//! into normal/extra/discount hour totals for reporting.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reconcile;
pub mod report;
