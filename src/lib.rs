//! Learning path service
//!
//! Exposes modules for integration testing

pub mod cli;
pub mod config;
pub mod llm;
pub mod metrics;
pub mod search;
pub mod server;

use anyhow::{Context, Result};
use path_core::{PathService, TreeEnricher};

pub use config::Config;

/// Wire the configured generator and resolver into a [`PathService`].
pub fn build_path_service(config: &Config) -> Result<PathService> {
    let generator = llm::build_generator(&config.llm).context("failed to build text generator")?;
    let resolver = search::build_resolver(&config.search).context("failed to build resolver")?;
    let enricher =
        TreeEnricher::new(resolver).with_book_qualifier(config.search.book_qualifier.clone());
    Ok(PathService::new(generator, enricher))
}
