use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_HEALTH_INTERVAL_MS: u64 = 15_000;

/// How overlapping submissions settle the displayed result.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOrdering {
    /// Whichever response arrives last becomes the current result.
    #[default]
    LastResponse,
    /// Responses older than the last applied submission only land in history.
    LatestSubmission,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub health_interval_ms: Option<u64>,
    pub ordering: Option<SubmissionOrdering>,
}
