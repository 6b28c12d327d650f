// src/pipeline/run.rs

//! Batch accumulation over the discovered route list.

use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::models::{RouteResponse, RunResult};
use crate::services::RouteApi;
use crate::storage::RunStorage;
use crate::utils::extract_route_code;

use super::normalize::{RouteError, normalize};
use super::recorder::ErrorRecorder;

/// Outcome of one full ingestion run.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub stop_rows: usize,
    pub schedule_rows: usize,
    pub error_rows: usize,
    /// Run folder name, `%Y%m%d%H%M%S`
    pub folder: String,
    /// Where the datasets ended up
    pub location: String,
}

/// Walks a route list, fetching and normalizing each route while isolating
/// per-route failures.
pub struct BatchRunner<'a> {
    api: &'a dyn RouteApi,
    max_concurrent: usize,
    request_delay: Duration,
}

impl<'a> BatchRunner<'a> {
    pub fn new(api: &'a dyn RouteApi, max_concurrent: usize, request_delay_ms: u64) -> Self {
        Self {
            api,
            max_concurrent: max_concurrent.max(1),
            request_delay: Duration::from_millis(request_delay_ms),
        }
    }

    /// Process every route code and accumulate the three datasets.
    ///
    /// Fetches run on a bounded pool; accumulation happens on the consuming
    /// task, in completion order. A route that fails contributes exactly one
    /// error record and zero rows, and never disturbs the routes still in
    /// flight. Always returns a [`RunResult`], empty collections included.
    pub async fn run(&self, codes: &[String]) -> RunResult {
        let mut result = RunResult::new();
        let mut recorder = ErrorRecorder::new();

        let mut fetches = stream::iter(codes)
            .map(|code| async move {
                let payload = self.api.fetch_route(code).await;
                (code.as_str(), payload)
            })
            .buffer_unordered(self.max_concurrent);

        while let Some((code, payload)) = fetches.next().await {
            match payload {
                Some(value) => self.accumulate(code, value, &mut result, &mut recorder),
                None => {
                    log::warn!("Route {code}: fetch failed");
                    recorder.record(code, &RouteError::Fetch.to_string());
                }
            }

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        result.errors = recorder.into_records();
        result
    }

    /// Normalize one fetched payload into the run's accumulators.
    ///
    /// The detail endpoint may answer with a single route object or a list;
    /// each element is processed independently.
    fn accumulate(
        &self,
        code: &str,
        value: Value,
        result: &mut RunResult,
        recorder: &mut ErrorRecorder,
    ) {
        let response: RouteResponse = match serde_json::from_value(value) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Route {code}: unexpected payload shape: {e}");
                recorder.record(code, &RouteError::UnexpectedShape.to_string());
                return;
            }
        };

        for payload in response.into_payloads() {
            match normalize(&payload, code) {
                Ok((stops, schedules)) => {
                    log::debug!(
                        "Route {code}: {} stops, {} schedule entries",
                        stops.len(),
                        schedules.len()
                    );
                    result.extend_rows(stops, schedules);
                }
                Err(e) => {
                    log::warn!("Route {code}: {e}");
                    recorder.record(code, &e.to_string());
                }
            }
        }
    }
}

/// Run the whole pipeline: discover, ingest, persist.
///
/// Only a failed discovery aborts the run; everything per-route lands in
/// the errors dataset instead.
pub async fn run_ingest(
    config: &Config,
    api: &dyn RouteApi,
    storage: &dyn RunStorage,
) -> Result<IngestSummary> {
    let references = api.discover().await?;
    log::info!("Discovered {} route references", references.len());

    let codes: Vec<String> = references
        .iter()
        .map(|reference| extract_route_code(reference))
        .collect();

    let runner = BatchRunner::new(api, config.api.max_concurrent, config.api.request_delay_ms);
    let result = runner.run(&codes).await;

    log::info!(
        "Run produced {} stop rows, {} schedule rows, {} errors",
        result.stops.len(),
        result.schedules.len(),
        result.errors.len()
    );

    let folder = Utc::now().format("%Y%m%d%H%M%S").to_string();
    let metadata = storage.persist(&result, &folder).await?;

    Ok(IngestSummary {
        stop_rows: result.stops.len(),
        schedule_rows: result.schedules.len(),
        error_rows: result.errors.len(),
        folder,
        location: metadata.location,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::AppError;
    use crate::models::Direction;

    /// Canned API: a discovery list plus per-code payloads, `None` meaning
    /// a failed fetch.
    struct CannedApi {
        references: Vec<String>,
        payloads: HashMap<String, Option<Value>>,
    }

    #[async_trait]
    impl RouteApi for CannedApi {
        async fn discover(&self) -> Result<Vec<String>> {
            if self.references.is_empty() {
                return Err(AppError::discovery("no routes"));
            }
            Ok(self.references.clone())
        }

        async fn fetch_route(&self, code: &str) -> Option<Value> {
            self.payloads.get(code).cloned().flatten()
        }
    }

    fn direction_json(schedules: usize, stops: usize) -> Value {
        let horarios: Vec<Value> = (0..schedules)
            .map(|i| json!({"tipoDia": format!("dia{i}"), "inicio": "05:30", "fin": "23:00"}))
            .collect();
        let paraderos: Vec<Value> = (0..stops)
            .map(|i| json!({"name": format!("PA{i}"), "comuna": "Santiago", "pos": [-33.4, -70.6]}))
            .collect();
        json!({"horarios": horarios, "paraderos": paraderos})
    }

    fn valid_route_json(out_stops: usize, ret_stops: usize, out_sched: usize, ret_sched: usize) -> Value {
        json!({
            "ida": direction_json(out_sched, out_stops),
            "regreso": direction_json(ret_sched, ret_stops),
        })
    }

    fn runner_over(api: &CannedApi) -> BatchRunner<'_> {
        BatchRunner::new(api, 3, 0)
    }

    #[tokio::test]
    async fn discovery_scenario_with_one_failed_fetch() {
        let api = CannedApi {
            references: vec!["url?codsint=101".into(), "url?codsint=202".into()],
            payloads: HashMap::from([
                ("101".to_string(), Some(valid_route_json(3, 2, 2, 1))),
                ("202".to_string(), None),
            ]),
        };

        let codes: Vec<String> = api.references.iter().map(|r| extract_route_code(r)).collect();
        let result = runner_over(&api).run(&codes).await;

        assert_eq!(result.stops.len(), 5);
        assert!(result.stops.iter().all(|s| s.recorrido == "101"));
        assert_eq!(result.schedules.len(), 3);
        assert!(result.schedules.iter().all(|s| s.recorrido == "101"));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].recorrido, "202");
        assert_eq!(result.errors[0].error_msg, "fetch failed");
    }

    #[tokio::test]
    async fn failures_do_not_leak_rows_regardless_of_position() {
        // Failing routes first, middle, and last; only the valid ones
        // contribute rows.
        let api = CannedApi {
            references: vec!["1".into(), "2".into(), "3".into(), "4".into(), "5".into()],
            payloads: HashMap::from([
                ("1".to_string(), None),
                ("2".to_string(), Some(valid_route_json(2, 2, 1, 1))),
                ("3".to_string(), Some(json!({"ida": {"horarios": []}}))),
                ("4".to_string(), Some(valid_route_json(1, 1, 1, 1))),
                ("5".to_string(), Some(json!("not a route"))),
            ]),
        };

        let codes: Vec<String> = api.references.clone();
        let result = runner_over(&api).run(&codes).await;

        assert_eq!(result.errors.len(), 3);
        let failed: Vec<_> = result.errors.iter().map(|e| e.recorrido.as_str()).collect();
        assert!(failed.contains(&"1"));
        assert!(failed.contains(&"3"));
        assert!(failed.contains(&"5"));

        assert_eq!(result.stops.len(), 2 + 2 + 1 + 1);
        assert!(result.stops.iter().all(|s| s.recorrido == "2" || s.recorrido == "4"));
        assert!(!result.stops.iter().any(|s| s.recorrido == "3"));
    }

    #[tokio::test]
    async fn list_payload_elements_are_normalized_independently() {
        // One element valid, one missing its regreso stops: the valid
        // element's rows survive next to the error record.
        let api = CannedApi {
            references: vec!["T1".into()],
            payloads: HashMap::from([(
                "T1".to_string(),
                Some(json!([
                    valid_route_json(2, 1, 1, 1),
                    {"ida": direction_json(1, 1), "regreso": {"horarios": []}},
                ])),
            )]),
        };

        let result = runner_over(&api).run(&["T1".to_string()]).await;

        assert_eq!(result.stops.len(), 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_msg, "missing regreso stops");
    }

    #[tokio::test]
    async fn within_route_row_order_is_preserved() {
        let api = CannedApi {
            references: vec!["9".into()],
            payloads: HashMap::from([(
                "9".to_string(),
                Some(json!({
                    "ida": {
                        "horarios": [{"tipoDia": "Laboral", "inicio": "06:00", "fin": "22:00"}],
                        "paraderos": [
                            {"name": "first", "comuna": "A", "pos": [-33.0, -70.0]},
                            {"name": "second", "comuna": "B"},
                        ],
                    },
                    "regreso": direction_json(1, 1),
                })),
            )]),
        };

        let result = runner_over(&api).run(&["9".to_string()]).await;

        let ida: Vec<_> = result
            .stops
            .iter()
            .filter(|s| s.trayecto == Direction::Ida)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(ida, ["first", "second"]);
    }

    #[tokio::test]
    async fn all_routes_failing_yields_empty_but_concrete_collections() {
        let api = CannedApi {
            references: vec!["1".into(), "2".into()],
            payloads: HashMap::new(),
        };

        let result = runner_over(&api).run(&["1".to_string(), "2".to_string()]).await;

        assert!(result.stops.is_empty());
        assert!(result.schedules.is_empty());
        assert_eq!(result.errors.len(), 2);
    }
}
