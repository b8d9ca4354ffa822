use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::cli::context::CliContext;

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// What the learner wants to achieve
    #[arg(long)]
    pub goal: String,

    /// Current level of the learner
    #[arg(long)]
    pub level: String,

    /// Pretty-print the resulting JSON
    #[arg(long)]
    pub pretty: bool,
}

pub async fn cmd_generate(args: GenerateArgs, ctx: &CliContext) -> Result<()> {
    let service = ctx.service()?;
    let outcome = service
        .generate_path(&args.goal, &args.level)
        .await
        .context("learning path generation failed")?;

    info!(
        nodes = outcome.report.nodes_visited,
        lookups = outcome.report.lookups,
        verified = outcome.report.verified,
        dropped = outcome.report.dropped,
        "Enrichment finished"
    );

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&outcome.path)?
    } else {
        serde_json::to_string(&outcome.path)?
    };
    println!("{rendered}");
    Ok(())
}
