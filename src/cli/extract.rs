use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use path_core::extract_structured;
use tokio::io::AsyncReadExt;

#[derive(Args, Clone)]
pub struct ExtractArgs {
    /// File holding raw model output (`-` reads stdin)
    pub input: PathBuf,
}

pub async fn cmd_extract(args: ExtractArgs) -> Result<()> {
    let raw = read_input(&args.input).await?;
    let value = extract_structured(&raw)
        .ok_or_else(|| anyhow!("no JSON object found in {}", args.input.display()))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn read_input(input: &PathBuf) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read stdin")?;
        return Ok(raw);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))
}
