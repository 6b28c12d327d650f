//! red-ingest CLI
//!
//! Local execution entry point. For AWS Lambda, use `red-ingest-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use red_ingest::{
    config::Config,
    error::Result,
    pipeline,
    services::HttpRouteApi,
    storage::LocalStorage,
};

/// red-ingest - Red transit route dataset builder
#[derive(Parser, Debug)]
#[command(
    name = "red-ingest",
    version,
    about = "Fetches Red transit routes and builds CSV datasets"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: discover routes, ingest, write CSV datasets
    Run {
        /// Keep the run folder local, skip the bucket upload
        /// (upload requires the "s3" feature)
        #[arg(long)]
        no_upload: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("red-ingest starting...");

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Run { no_upload } => {
            config.validate()?;

            let api = HttpRouteApi::new(&config.api)?;
            let storage = LocalStorage::new(&config.storage.output);

            let summary = pipeline::run_ingest(&config, &api, &storage).await?;
            log::info!(
                "Run {} complete: {} stop rows, {} schedule rows, {} errors at {}",
                summary.folder,
                summary.stop_rows,
                summary.schedule_rows,
                summary.error_rows,
                summary.location
            );

            #[cfg(not(feature = "s3"))]
            if no_upload {
                log::debug!("--no-upload has no effect without the \"s3\" feature");
            }

            #[cfg(feature = "s3")]
            if !no_upload {
                let s3 = red_ingest::storage::S3Storage::from_env(
                    &config.storage.bucket,
                    &config.storage.prefix,
                )
                .await;
                s3.upload_run(&storage.run_dir(&summary.folder), &summary.folder)
                    .await?;
                storage.remove_run(&summary.folder).await?;
                log::info!(
                    "Run {} uploaded to bucket {} and removed locally",
                    summary.folder,
                    config.storage.bucket
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {e}");
                return Err(e);
            }
            log::info!("Discovery endpoint: {}", config.api.discovery_url());
            log::info!("Output directory: {}", config.storage.output.display());
            log::info!("All validations passed!");
        }
    }

    log::info!("Done!");

    Ok(())
}
