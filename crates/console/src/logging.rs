use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "console.log";
/// Our crates at `info`, HTTP stack dependencies only when they warn.
const DEFAULT_DIRECTIVES: &str = "warn,router_console=info,router_client=info";

/// The terminal belongs to the REPL, so records go to a daily JSON file in
/// `log_dir`. `RUST_LOG` replaces the default directives; `log_to_stderr`
/// mirrors records to stderr in compact form.
pub(crate) fn init_tracing(log_dir: &Path, log_to_stderr: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_writer(file_writer);
    let stderr_layer = log_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(console_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;
    Ok(guard)
}

fn console_filter(env_directives: Option<&str>) -> EnvFilter {
    env_directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
