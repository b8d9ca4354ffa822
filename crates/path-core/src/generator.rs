use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::PathError;

/// Abstraction over text-generation backends so multiple vendors can produce
/// learning paths. The returned text is untrusted and parsed leniently.
#[async_trait]
pub trait PathGenerator: Send + Sync {
    /// Short identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, PathError>;
}

/// Generator that replays canned text; used for tests and offline development.
#[derive(Debug, Default)]
pub struct StaticGenerator {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl PathGenerator for StaticGenerator {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn generate(&self, prompt: &str) -> Result<String, PathError> {
        self.prompts.lock().push(prompt.to_string());
        if self.response.trim().is_empty() {
            return Err(PathError::generation("static generator has no response"));
        }
        Ok(self.response.clone())
    }
}
