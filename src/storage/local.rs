// src/storage/local.rs

//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::RunResult;
use crate::storage::{ERRORS_FILE, RunStorage, SCHEDULES_FILE, STOPS_FILE, WriteMetadata};

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Full path of one run folder.
    pub fn run_dir(&self, folder: &str) -> PathBuf {
        self.root_dir.join(folder)
    }

    /// Serialize rows to CSV bytes with a header row.
    ///
    /// Column order follows struct field declaration order, which is the
    /// fixed dataset layout. An empty row set still yields the header.
    fn to_csv_bytes<T: Serialize>(rows: &[T], empty_header: &[&str]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if rows.is_empty() {
            writer.write_record(empty_header)?;
        } else {
            for row in rows {
                writer.serialize(row)?;
            }
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| crate::error::AppError::storage("csv writer", e.error()))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Delete one run folder after a successful upload.
    pub async fn remove_run(&self, folder: &str) -> Result<()> {
        tokio::fs::remove_dir_all(self.run_dir(folder)).await?;
        Ok(())
    }
}

#[async_trait]
impl RunStorage for LocalStorage {
    async fn persist(&self, result: &RunResult, folder: &str) -> Result<WriteMetadata> {
        let dir = self.run_dir(folder);

        let stops = Self::to_csv_bytes(
            &result.stops,
            &["recorrido", "trayecto", "name", "comuna", "latitud", "longitud"],
        )?;
        let schedules = Self::to_csv_bytes(
            &result.schedules,
            &["recorrido", "trayecto", "tipoDia", "inicio", "fin"],
        )?;
        let errors = Self::to_csv_bytes(&result.errors, &["recorrido", "error_msg"])?;

        self.write_bytes(&dir.join(STOPS_FILE), &stops).await?;
        self.write_bytes(&dir.join(SCHEDULES_FILE), &schedules)
            .await?;
        self.write_bytes(&dir.join(ERRORS_FILE), &errors).await?;

        Ok(WriteMetadata {
            row_count: result.stops.len() + result.schedules.len() + result.errors.len(),
            timestamp: Utc::now(),
            location: dir.display().to_string(),
        })
    }
}
