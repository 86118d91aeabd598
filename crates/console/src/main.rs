mod alert;
mod app;
mod cli;
mod config;
mod events;
mod input;
mod logging;
mod render;
mod runtime;
mod state;

use crate::cli::Args;
use crate::config::{build_settings, expand_tilde};
use crate::logging::init_tracing;
use crate::render::Palette;
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_dir = expand_tilde(&args.log_dir);
    let _log_guard = init_tracing(&log_dir, args.log_to_stderr)
        .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;

    let settings = build_settings(&args)?;
    info!(
        base_url = %settings.base_url,
        timeout_ms = settings.timeout.as_millis() as u64,
        health_interval_ms = settings.health_interval.as_millis() as u64,
        ordering = ?settings.ordering,
        "console starting"
    );
    app::run_console(settings, Palette::new(!args.no_color)).await?;
    info!("console exiting");
    Ok(())
}
