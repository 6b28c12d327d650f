// src/models/rows.rs

//! Normalized tabular output rows.
//!
//! Field order on these structs is load-bearing: the CSV writer emits
//! columns in declaration order, and the datasets have a fixed layout
//! (`paraderos.csv`, `horarios.csv`, `errores.csv`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Direction;

/// One stop of one direction of one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRow {
    /// Route code
    pub recorrido: String,

    /// Direction the stop belongs to
    pub trayecto: Direction,

    /// Stop display name
    pub name: String,

    /// District the stop belongs to
    pub comuna: String,

    /// Latitude shared by every stop of this direction (see normalizer)
    pub latitud: f64,

    /// Longitude shared by every stop of this direction
    pub longitud: f64,
}

/// One operating window of one direction of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Route code
    pub recorrido: String,

    /// Direction the window applies to
    pub trayecto: Direction,

    /// Day type (e.g. "Laboral")
    #[serde(rename = "tipoDia")]
    pub tipo_dia: String,

    /// Window start time
    pub inicio: String,

    /// Window end time
    pub fin: String,
}

/// One per-route processing failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Route code the failure belongs to
    pub recorrido: String,

    /// Human-readable failure message
    pub error_msg: String,

    /// Moment the failure was detected; kept on the record but not a
    /// column of the errors dataset
    #[serde(skip_serializing)]
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Accumulated output of one full batch run.
///
/// Created empty at run start, mutated only by the batch accumulator,
/// read-only once handed to persistence. Collections are always concrete,
/// even when every route failed.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub stops: Vec<StopRow>,
    pub schedules: Vec<ScheduleRow>,
    pub errors: Vec<ErrorRecord>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one route's normalized rows.
    pub fn extend_rows(&mut self, stops: Vec<StopRow>, schedules: Vec<ScheduleRow>) {
        self.stops.extend(stops);
        self.schedules.extend(schedules);
    }

    /// True when no route produced rows and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.schedules.is_empty() && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_record_csv_omits_timestamp() {
        let record = ErrorRecord {
            recorrido: "506".to_string(),
            error_msg: "fetch failed".to_string(),
            timestamp: Utc::now(),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("recorrido,error_msg"));
        assert_eq!(lines.next(), Some("506,fetch failed"));
    }

    #[test]
    fn run_result_starts_empty() {
        let result = RunResult::new();
        assert!(result.is_empty());
        assert!(result.stops.is_empty());
        assert!(result.schedules.is_empty());
        assert!(result.errors.is_empty());
    }
}
