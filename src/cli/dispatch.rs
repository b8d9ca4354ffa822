use super::env::CliArgs;
use super::extract::cmd_extract;
use super::generate::cmd_generate;
use super::resolve::cmd_resolve;
use super::serve::cmd_serve;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Serve(args) => cmd_serve(args, ctx).await,
        Commands::Generate(args) => cmd_generate(args, ctx).await,
        Commands::Resolve(args) => cmd_resolve(args, ctx).await,
        Commands::Extract(args) => cmd_extract(args).await,
    }
}
