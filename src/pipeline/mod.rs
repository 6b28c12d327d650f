// src/pipeline/mod.rs

//! Ingestion pipeline.
//!
//! - `normalize`: validate one route payload and flatten it into rows
//! - `run`: walk the discovered route list and accumulate a [`crate::models::RunResult`]

pub mod normalize;
pub mod recorder;
pub mod run;

pub use normalize::{RouteError, normalize};
pub use recorder::ErrorRecorder;
pub use run::{BatchRunner, IngestSummary, run_ingest};
