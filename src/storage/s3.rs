// src/storage/s3.rs

//! S3 upload of finished run folders.
//!
//! The pipeline always writes a run folder locally first; this backend
//! mirrors that folder into a bucket and the caller deletes the local copy
//! afterwards, matching the run lifecycle (write, upload, clean up).

use std::path::Path;

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};

/// S3-backed upload target for run folders.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 storage from ambient AWS configuration.
    pub async fn from_env(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket, prefix)
    }

    /// Object key for one file of one run folder.
    fn key(&self, folder: &str, file_name: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{folder}/{file_name}")
        } else {
            format!("{prefix}/{folder}/{file_name}")
        }
    }

    /// Upload one file.
    async fn put_file(&self, path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| AppError::S3(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type("text/csv")
            .send()
            .await
            .map_err(|e| AppError::S3(e.to_string()))?;

        log::info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }

    /// Upload every file of a local run folder under `{prefix}/{folder}/`.
    pub async fn upload_run(&self, local_dir: &Path, folder: &str) -> Result<usize> {
        let mut entries = tokio::fs::read_dir(local_dir).await?;
        let mut uploaded = 0;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            self.put_file(&path, &self.key(folder, &file_name)).await?;
            uploaded += 1;
        }

        log::info!(
            "Uploaded {uploaded} files of run {folder} to s3://{}",
            self.bucket
        );
        Ok(uploaded)
    }
}
