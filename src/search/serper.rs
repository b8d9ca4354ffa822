use std::time::Duration;

use async_trait::async_trait;
use path_core::{PathError, ResourceResolver, SearchHit};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::metrics;

#[derive(Debug, Clone)]
pub struct SerperConfig {
    pub api_key: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// Resolves resource suggestions against the Serper Google search API.
///
/// One POST per lookup, bounded by the configured timeout. Failures are
/// logged and reported as "not found".
pub struct SerperResolver {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("search returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("search response invalid: {0}")]
    Decode(#[source] reqwest::Error),
}

impl SerperResolver {
    pub fn new(config: SerperConfig) -> Result<Self, PathError> {
        if config.api_key.trim().is_empty() {
            return Err(PathError::invalid_config("missing Serper API key"));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                PathError::invalid_config(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self {
            client,
            endpoint: format!("{}/search", config.api_base.trim_end_matches('/')),
            api_key: config.api_key,
        })
    }

    /// Run one search and return the top organic result, if it has a usable link.
    pub async fn search(&self, query: &str) -> Result<Option<SearchHit>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest { q: query })
            .send()
            .await
            .map_err(SearchError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(SearchError::Status { status, body });
        }

        let payload: SearchResponse = response.json().await.map_err(SearchError::Decode)?;
        Ok(top_hit(query, payload))
    }
}

#[async_trait]
impl ResourceResolver for SerperResolver {
    async fn resolve(&self, query: &str) -> Option<SearchHit> {
        match self.search(query).await {
            Ok(Some(hit)) => {
                metrics::record_resource_lookup("verified");
                Some(hit)
            }
            Ok(None) => {
                metrics::record_resource_lookup("miss");
                debug!(target: "search", %query, "no usable organic result");
                None
            }
            Err(err) => {
                metrics::record_resource_lookup("error");
                warn!(target: "search", %query, error = %err, "search lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

fn top_hit(query: &str, response: SearchResponse) -> Option<SearchHit> {
    let first = response.organic.into_iter().next()?;
    let link = first.link.map(|link| link.trim().to_string())?;
    if !is_web_address(&link) {
        return None;
    }
    let title = first
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| query.to_string());
    Some(SearchHit::new(title, link))
}

fn is_web_address(link: &str) -> bool {
    Url::parse(link)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}
