use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Top search result for a query. Both fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Turns a free-text suggestion into a verified link.
///
/// `None` means "could not verify" and covers transport failures as well as
/// empty result sets. Implementations must not retry or cache.
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Option<SearchHit>;
}

/// Deterministic resolver backed by a fixed table of hits.
///
/// Every query is recorded, which makes lookup ordering observable in tests
/// and offline runs.
#[derive(Debug, Default)]
pub struct StaticResolver {
    hits: HashMap<String, SearchHit>,
    queries: Mutex<Vec<String>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hit(mut self, query: impl Into<String>, hit: SearchHit) -> Self {
        self.hits.insert(query.into(), hit);
        self
    }

    /// Queries seen so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl ResourceResolver for StaticResolver {
    async fn resolve(&self, query: &str) -> Option<SearchHit> {
        self.queries.lock().push(query.to_string());
        self.hits.get(query).cloned()
    }
}
