pub mod serper;

use std::sync::Arc;

use path_core::{PathError, ResourceResolver};

use crate::config::SearchConfig;

pub use serper::{SearchError, SerperConfig, SerperResolver};

/// Build the resolver used to verify suggested resources.
pub fn build_resolver(config: &SearchConfig) -> Result<Arc<dyn ResourceResolver>, PathError> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let resolver = SerperResolver::new(SerperConfig {
        api_key: api_key.trim().to_string(),
        api_base: config.api_base.clone(),
        timeout: config.timeout(),
    })?;
    Ok(Arc::new(resolver))
}
