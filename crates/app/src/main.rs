//! Payline daemon
//!
//! Loads configuration, prepares the database and runs the integration
//! scheduler until Ctrl-C.

use anyhow::Context;
use payline_app::AppContext;
use payline_infra::config;
use payline_infra::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "payline starting");

    let ctx = AppContext::new(config).context("failed to initialise application context")?;

    let mut scheduler = if ctx.config.scheduler.enabled {
        let mut scheduler = ctx.scheduler().context("invalid scheduler configuration")?;
        scheduler.start().await.context("failed to start integration scheduler")?;
        Some(scheduler)
    } else {
        tracing::info!("scheduler disabled, running a single integration cycle");
        let scheduler = ctx.scheduler().context("invalid scheduler configuration")?;
        scheduler.run_cycle().await;
        None
    };

    if let Some(scheduler) = scheduler.as_mut() {
        tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
        tracing::info!("shutdown requested");
        scheduler.stop().await.context("failed to stop integration scheduler")?;
    }

    let health = ctx.integration.health().await.context("failed to evaluate health")?;
    tracing::info!(status = %health.status, description = %health.description, "payline stopped");
    Ok(())
}
