// src/storage/mod.rs

//! Persistence of run results.
//!
//! Each run lands in its own timestamp-named folder containing the three
//! datasets:
//!
//! ```text
//! {output}/
//! └── 20240301153000/
//!     ├── paraderos.csv
//!     ├── horarios.csv
//!     └── errores.csv
//! ```
//!
//! `LocalStorage` writes the folder; the `s3` feature adds bucket upload of
//! a finished folder.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::RunResult;

// Re-export for convenience
pub use local::LocalStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;

/// Dataset file names within a run folder.
pub const STOPS_FILE: &str = "paraderos.csv";
pub const SCHEDULES_FILE: &str = "horarios.csv";
pub const ERRORS_FILE: &str = "errores.csv";

/// Metadata about a persisted run.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Total rows written across the three datasets
    pub row_count: usize,

    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,

    /// Human-readable location of the run folder
    pub location: String,
}

/// Trait for run-result persistence backends.
#[async_trait]
pub trait RunStorage: Send + Sync {
    /// Write all three datasets of a finished run into `folder`.
    ///
    /// The run result is final at this point; implementations only read it.
    async fn persist(&self, result: &RunResult, folder: &str) -> Result<WriteMetadata>;
}
