// src/models/mod.rs

//! Domain models for the ingestion application.
//!
//! `route` holds the raw shapes fetched from the transit API, `rows` holds
//! the normalized tabular output.

mod route;
mod rows;

// Re-export all public types
pub use route::{Direction, DirectionSection, RoutePayload, RouteResponse, ScheduleEntry, StopEntry};
pub use rows::{ErrorRecord, RunResult, ScheduleRow, StopRow};
