use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    learnpath::cli::app::run().await
}
