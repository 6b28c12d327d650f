// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Transit API endpoints and HTTP behavior
    #[serde(default)]
    pub api: ApiConfig,

    /// Output directories and bucket settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::config("api.base_url is empty"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.api.max_concurrent == 0 {
            return Err(AppError::config("api.max_concurrent must be > 0"));
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(AppError::config("storage.bucket is empty"));
        }
        Ok(())
    }
}

/// Transit API endpoints and HTTP client behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Red REST service
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between route fetches in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent route fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl ApiConfig {
    /// Endpoint listing every available route reference.
    pub fn discovery_url(&self) -> String {
        format!("{}/getservicios/all", self.base_url.trim_end_matches('/'))
    }

    /// Endpoint for one route's detail payload.
    pub fn detail_url(&self, code: &str) -> String {
        format!(
            "{}/conocerecorrido?codsint={}",
            self.base_url.trim_end_matches('/'),
            code
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Output directory and bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Local directory that receives one subfolder per run
    #[serde(default = "defaults::output")]
    pub output: PathBuf,

    /// Object-storage bucket for uploaded run folders
    #[serde(default = "defaults::bucket")]
    pub bucket: String,

    /// Key prefix inside the bucket (empty for bucket root)
    #[serde(default)]
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output: defaults::output(),
            bucket: defaults::bucket(),
            prefix: String::new(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "https://www.red.cl/restservice_v2/rest".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        5
    }
    pub fn output() -> PathBuf {
        PathBuf::from("output")
    }
    pub fn bucket() -> String {
        "data_realtime".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.api.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoint_urls() {
        let api = ApiConfig::default();
        assert_eq!(
            api.discovery_url(),
            "https://www.red.cl/restservice_v2/rest/getservicios/all"
        );
        assert_eq!(
            api.detail_url("506"),
            "https://www.red.cl/restservice_v2/rest/conocerecorrido?codsint=506"
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            max_concurrent = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.api.max_concurrent, 2);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.bucket, "data_realtime");
    }
}
