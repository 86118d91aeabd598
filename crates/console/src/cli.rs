use clap::{Parser, ValueEnum};
use router_protocol::config::SubmissionOrdering;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OrderingArg {
    LastResponse,
    LatestSubmission,
}

impl From<OrderingArg> for SubmissionOrdering {
    fn from(value: OrderingArg) -> Self {
        match value {
            OrderingArg::LastResponse => SubmissionOrdering::LastResponse,
            OrderingArg::LatestSubmission => SubmissionOrdering::LatestSubmission,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "sochsamajh-console",
    version,
    about = "Terminal client for the SochSamajh medical and legal query router"
)]
pub(crate) struct Args {
    /// Optional TOML file with base_url, timeout_ms, health_interval_ms, ordering.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Backend base URL; overrides SOCHSAMAJH_API_BASE_URL and the config file.
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    #[arg(long)]
    pub(crate) timeout_ms: Option<u64>,
    #[arg(long)]
    pub(crate) health_interval_ms: Option<u64>,
    #[arg(long, value_enum)]
    pub(crate) ordering: Option<OrderingArg>,
    #[arg(long, default_value = "~/.sochsamajh/logs")]
    pub(crate) log_dir: String,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    #[arg(long, default_value_t = false)]
    pub(crate) no_color: bool,
}
