//! Application state for the punch reconciliation API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::reconcile::PunchEngine;
use crate::report::{RotationCalendar, WorkCalendar};

/// Shared application state.
///
/// Contains the engine (store, directory and schedule table behind it) and
/// the working-day calendar used for absence fill-in.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<PunchEngine>,
    calendar: Arc<dyn WorkCalendar>,
}

impl AppState {
    /// Creates a new application state with the default rotation calendar.
    pub fn new(engine: PunchEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            calendar: Arc::new(RotationCalendar),
        }
    }

    /// Replaces the working-day calendar.
    pub fn with_calendar(mut self, calendar: Arc<dyn WorkCalendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &PunchEngine {
        &self.engine
    }

    /// Returns the working-day calendar.
    pub fn calendar(&self) -> &dyn WorkCalendar {
        self.calendar.as_ref()
    }
}
