// src/pipeline/recorder.rs

//! Run-scoped failure recorder.

use std::collections::HashSet;

use chrono::Utc;

use crate::models::ErrorRecord;

/// Collects per-route failure records for one run.
///
/// Records keep detection order. Identical `(route, message)` pairs are
/// recorded once per run.
#[derive(Debug, Default)]
pub struct ErrorRecorder {
    records: Vec<ErrorRecord>,
    seen: HashSet<(String, String)>,
}

impl ErrorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure, stamped with the current time.
    pub fn record(&mut self, route: &str, message: &str) {
        if self.seen.insert((route.to_string(), message.to_string())) {
            self.records.push(ErrorRecord {
                recorrido: route.to_string(),
                error_msg: message.to_string(),
                timestamp: Utc::now(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hand the records off, consuming the recorder.
    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }
}
