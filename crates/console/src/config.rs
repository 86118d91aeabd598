use anyhow::Context;
use router_protocol::config::{
    ConsoleConfig, SubmissionOrdering, DEFAULT_BASE_URL, DEFAULT_HEALTH_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Args;

pub(crate) const BASE_URL_ENV: &str = "SOCHSAMAJH_API_BASE_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ConsoleSettings {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) health_interval: Duration,
    pub(crate) ordering: SubmissionOrdering,
}

pub(crate) fn load_console_config(path: &Path) -> anyhow::Result<ConsoleConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ConsoleConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Flag, then environment, then config file, then built-in default.
pub(crate) fn resolve_settings(
    args: &Args,
    file: ConsoleConfig,
    env_base_url: Option<String>,
) -> anyhow::Result<ConsoleSettings> {
    let env_base_url = env_base_url.filter(|value| !value.trim().is_empty());
    let base_url = args
        .base_url
        .clone()
        .or(env_base_url)
        .or(file.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout_ms = args
        .timeout_ms
        .or(file.timeout_ms)
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    let health_interval_ms = args
        .health_interval_ms
        .or(file.health_interval_ms)
        .unwrap_or(DEFAULT_HEALTH_INTERVAL_MS);
    let ordering = args
        .ordering
        .map(SubmissionOrdering::from)
        .or(file.ordering)
        .unwrap_or_default();

    let base_url = base_url.trim().to_string();
    if base_url.is_empty() {
        anyhow::bail!("base_url cannot be empty");
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        anyhow::bail!("base_url {base_url} must start with http:// or https://");
    }
    if timeout_ms == 0 {
        anyhow::bail!("timeout_ms must be greater than zero");
    }
    if health_interval_ms == 0 {
        anyhow::bail!("health_interval_ms must be greater than zero");
    }

    Ok(ConsoleSettings {
        base_url,
        timeout: Duration::from_millis(timeout_ms),
        health_interval: Duration::from_millis(health_interval_ms),
        ordering,
    })
}

pub(crate) fn build_settings(args: &Args) -> anyhow::Result<ConsoleSettings> {
    let file = match args.config.as_ref() {
        Some(path) => load_console_config(&expand_tilde(&path.to_string_lossy()))?,
        None => ConsoleConfig::default(),
    };
    resolve_settings(args, file, std::env::var(BASE_URL_ENV).ok())
}

pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
