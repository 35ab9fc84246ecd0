//! HTTP API module for the punch reconciliation engine.
//!
//! This module provides the REST endpoints for recording, correcting and
//! deleting punches, and for the listing and monthly report queries.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ClockPunchRequest, CorrectPunchRequest, CreatePunchRequest};
pub use response::ApiError;
pub use state::AppState;
