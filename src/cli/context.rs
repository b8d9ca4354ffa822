use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::OnceCell;
use path_core::PathService;

use crate::{build_path_service, Config};

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    service: OnceCell<Arc<PathService>>,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            service: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Build the path service on first use; commands that never need it
    /// (such as `extract`) do not require credentials.
    pub fn service(&self) -> Result<Arc<PathService>> {
        self.service
            .get_or_try_init(|| {
                self.config.validate_credentials()?;
                build_path_service(&self.config).map(Arc::new)
            })
            .map(Arc::clone)
    }
}
