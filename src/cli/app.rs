use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, load_local_env_overrides, LoadedConfig};
use crate::metrics;

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();
    init_logging(&cli.log_level, cli.debug, cli.log_format)?;
    for path in load_local_env_overrides() {
        info!(path = %path.display(), "Loaded environment overrides");
    }
    metrics::register_metrics();

    info!(
        git_hash = env!("GIT_HASH"),
        build_date = env!("BUILD_DATE"),
        "Starting learnpath v{}",
        env!("CARGO_PKG_VERSION")
    );

    let LoadedConfig { config, path } = load_config(cli.config.as_ref()).await?;
    debug!(
        provider = ?config.llm.provider,
        model = %config.llm.model(),
        "LLM backend selected"
    );
    let cli_context = CliContext::new(config, path);

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
