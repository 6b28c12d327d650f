// src/services/api.rs

//! Transit API client.
//!
//! The pipeline talks to the API through the [`RouteApi`] trait so tests
//! can substitute a canned implementation; [`HttpRouteApi`] is the real
//! one, backed by reqwest.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::utils::http;

/// Access to the transit API.
#[async_trait]
pub trait RouteApi: Send + Sync {
    /// Fetch the list of available route references.
    ///
    /// Failure here is fatal to the run; there is nothing to process
    /// without it.
    async fn discover(&self) -> Result<Vec<String>>;

    /// Fetch one route's detail payload.
    ///
    /// `None` signals a non-success HTTP status, a transport error, or an
    /// unparseable body; none of those propagate as errors.
    async fn fetch_route(&self, code: &str) -> Option<Value>;
}

/// HTTP implementation of [`RouteApi`] against the Red REST service.
pub struct HttpRouteApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpRouteApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
            config: config.clone(),
        })
    }

    /// Fetch a URL and parse the body as JSON, mapping every failure mode
    /// to `None`.
    async fn get_json(&self, url: &str) -> Option<Value> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Request to {url} failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!("Non-success status {} from {url}", response.status());
            return None;
        }
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read body from {url}: {e}");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Body from {url} is not valid JSON: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl RouteApi for HttpRouteApi {
    async fn discover(&self) -> Result<Vec<String>> {
        let url = self.config.discovery_url();
        let value = self
            .get_json(&url)
            .await
            .ok_or_else(|| AppError::discovery(format!("could not fetch route list from {url}")))?;

        let entries = value
            .as_array()
            .ok_or_else(|| AppError::discovery("route list is not a JSON array"))?;

        let mut references = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.as_str() {
                Some(reference) => references.push(reference.to_string()),
                None => log::warn!("Skipping non-string route reference: {entry}"),
            }
        }
        Ok(references)
    }

    async fn fetch_route(&self, code: &str) -> Option<Value> {
        self.get_json(&self.config.detail_url(code)).await
    }
}
