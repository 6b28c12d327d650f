//! AWS Lambda entry point for red-ingest
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//! Each invocation performs one full ingestion run and uploads the run
//! folder to the configured bucket.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use red_ingest::config::Config;
use red_ingest::error::Result;
use red_ingest::pipeline::{self, IngestSummary};
use red_ingest::services::HttpRouteApi;
use red_ingest::storage::{LocalStorage, S3Storage};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("red-ingest Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for AWS Lambda events.
async fn handler(event: LambdaEvent<Value>) -> std::result::Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    match run_lambda_pipeline().await {
        Ok(summary) => {
            info!(
                "Lambda execution successful: run {} with {} stop rows",
                summary.folder, summary.stop_rows
            );
            Ok(serde_json::json!({
                "status": "success",
                "folder": summary.folder,
                "stop_rows": summary.stop_rows,
                "schedule_rows": summary.schedule_rows,
                "error_rows": summary.error_rows,
            }))
        }
        Err(e) => {
            error!("Lambda execution failed: {}", e);
            Ok(serde_json::json!({
                "status": "error",
                "message": e.to_string()
            }))
        }
    }
}

/// One full run: ingest locally under /tmp, upload, delete the local copy.
async fn run_lambda_pipeline() -> Result<IngestSummary> {
    let mut config = Config::default();
    config.storage.output = std::path::PathBuf::from("/tmp");
    if let Ok(bucket) = std::env::var("INGEST_BUCKET") {
        config.storage.bucket = bucket;
    }
    if let Ok(prefix) = std::env::var("INGEST_PREFIX") {
        config.storage.prefix = prefix;
    }
    config.validate()?;

    let api = HttpRouteApi::new(&config.api)?;
    let storage = LocalStorage::new(&config.storage.output);

    let summary = pipeline::run_ingest(&config, &api, &storage).await?;

    let s3 = S3Storage::from_env(&config.storage.bucket, &config.storage.prefix).await;
    s3.upload_run(&storage.run_dir(&summary.folder), &summary.folder)
        .await?;
    storage.remove_run(&summary.folder).await?;

    Ok(summary)
}
