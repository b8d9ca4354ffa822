use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::server::{build_router, ServeHealth, ServeState};

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Address to bind (defaults to the configured host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to the configured port or $PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let service = ctx.service().context("cannot start the path service")?;
    let health = Arc::new(ServeHealth::new());
    let state = ServeState::with_health(Arc::clone(&service), Arc::clone(&health));

    health.mark_live();
    health.mark_ready();
    info!(generator = service.generator_name(), "Path service ready");

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("invalid bind address '{host}'"))?;
    let addr = SocketAddr::new(ip, port);

    let router = build_router().with_state(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind server on {}", addr))?;
    info!("Learning path service available at http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(health))
        .await
        .context("server exited unexpectedly")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(health: Arc<ServeHealth>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    health.mark_unready("shutting down");
    info!("Shutdown signal received; draining connections");
}
