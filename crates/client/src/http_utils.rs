use crate::error::ClientError;

pub(crate) fn normalize_base_url(base: &str) -> Result<String, ClientError> {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidBaseUrl("base_url is empty".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::InvalidBaseUrl(format!(
            "{trimmed} must start with http:// or https://"
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub(crate) fn join_base_path(base: &str, path: &str) -> String {
    let normalized_base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{normalized_base}{path}")
    } else {
        format!("{normalized_base}/{path}")
    }
}

/// Shortens a response body for log lines.
pub(crate) fn log_excerpt(body: &str) -> String {
    const LIMIT: usize = 256;
    let escaped = body.replace('\n', "\\n");
    if escaped.chars().count() <= LIMIT {
        return escaped;
    }
    let mut cut: String = escaped.chars().take(LIMIT).collect();
    cut.push_str("...");
    cut
}
