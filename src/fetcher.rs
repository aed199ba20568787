use crate::types::{FetchConfig, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper around one configured HTTP client, shared by every adapter.
///
/// Each source gets exactly one attempt per request; recovery from failures
/// happens at the adapter and aggregator boundaries, not here.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// One GET, body returned as text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// One GET with query parameters, body decoded as JSON.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
