use anyhow::{Context, Result};
use clap::Args;

use crate::cli::context::CliContext;
use crate::search::{SerperConfig, SerperResolver};

#[derive(Args, Clone)]
pub struct ResolveArgs {
    /// Free-text query, e.g. a book or course title
    pub query: String,
}

pub async fn cmd_resolve(args: ResolveArgs, ctx: &CliContext) -> Result<()> {
    let search = &ctx.config().search;
    let resolver = SerperResolver::new(SerperConfig {
        api_key: search.api_key.clone().unwrap_or_default(),
        api_base: search.api_base.clone(),
        timeout: search.timeout(),
    })?;

    // Lookup errors are reported here; the enricher treats them as misses.
    match resolver
        .search(&args.query)
        .await
        .with_context(|| format!("lookup for '{}' failed", args.query))?
    {
        Some(hit) => println!("{}", serde_json::to_string_pretty(&hit)?),
        None => println!("not found"),
    }
    Ok(())
}
