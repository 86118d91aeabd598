use router_protocol::{HealthStatus, RouterResponse};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

pub(crate) const SUBMIT_ERROR_MESSAGE: &str = "Unable to process the request. Please try again.";

#[derive(Clone, Debug)]
pub(crate) struct HistoryItem {
    pub(crate) id: String,
    pub(crate) query: String,
    pub(crate) result: Arc<RouterResponse>,
    pub(crate) timestamp: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HealthIndicator {
    /// No probe has completed yet.
    Pending,
    Ready,
    Unreachable,
}

/// Everything the console shows, owned by one [`crate::runtime::RouterView`].
#[derive(Default)]
pub(crate) struct ViewState {
    health: Option<HealthStatus>,
    in_flight: usize,
    error: Option<String>,
    current: Option<Arc<RouterResponse>>,
    history: VecDeque<HistoryItem>,
    last_applied_seq: u64,
}

impl ViewState {
    pub(crate) fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    pub(crate) fn health_indicator(&self) -> HealthIndicator {
        match self.health.as_ref() {
            None => HealthIndicator::Pending,
            Some(status) if status.is_ok() => HealthIndicator::Ready,
            Some(_) => HealthIndicator::Unreachable,
        }
    }

    pub(crate) fn set_health(&mut self, status: HealthStatus) {
        self.health = Some(status);
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn current(&self) -> Option<&Arc<RouterResponse>> {
        self.current.as_ref()
    }

    /// Newest first.
    pub(crate) fn history(&self) -> &VecDeque<HistoryItem> {
        &self.history
    }

    pub(crate) fn begin_submission(&mut self) {
        self.error = None;
        self.in_flight += 1;
    }

    pub(crate) fn finish_submission(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    pub(crate) fn record_success(
        &mut self,
        seq: u64,
        query: String,
        response: RouterResponse,
        received_at: SystemTime,
        make_current: bool,
    ) -> HistoryItem {
        let result = Arc::new(response);
        let item = HistoryItem {
            id: result.request_id.clone(),
            query,
            result: Arc::clone(&result),
            timestamp: format_timestamp(received_at),
        };
        self.history.push_front(item.clone());
        if make_current {
            self.current = Some(result);
            self.last_applied_seq = self.last_applied_seq.max(seq);
        }
        item
    }

    pub(crate) fn record_failure(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    pub(crate) fn select_history(&mut self, id: &str) -> Option<HistoryItem> {
        let item = self.history.iter().find(|item| item.id == id)?.clone();
        self.current = Some(Arc::clone(&item.result));
        Some(item)
    }

    pub(crate) fn select_history_at(&mut self, index: usize) -> Option<HistoryItem> {
        let item = self.history.get(index)?.clone();
        self.current = Some(Arc::clone(&item.result));
        Some(item)
    }

    /// History entry backing the current result. Request ids are server
    /// assigned and not guaranteed unique, so match on identity.
    pub(crate) fn current_item(&self) -> Option<&HistoryItem> {
        let current = self.current.as_ref()?;
        self.history
            .iter()
            .find(|item| Arc::ptr_eq(&item.result, current))
    }
}

pub(crate) fn format_timestamp(time: SystemTime) -> String {
    humantime::format_rfc3339_millis(time).to_string()
}

/// `HH:MM:SS` portion of an RFC 3339 timestamp.
pub(crate) fn clock_time(timestamp: &str) -> &str {
    timestamp.get(11..19).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_support::sample_response;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn new_history_goes_to_the_head() {
        let mut state = ViewState::default();
        let now = SystemTime::now();
        state.record_success(1, "first".into(), sample_response("req-1"), now, true);
        state.record_success(2, "second".into(), sample_response("req-2"), now, true);
        let ids: Vec<_> = state.history().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["req-2", "req-1"]);
        assert_eq!(state.current().map(|r| r.request_id.as_str()), Some("req-2"));
        assert_eq!(state.last_applied_seq(), 2);
    }

    #[test]
    fn history_only_record_keeps_current() {
        let mut state = ViewState::default();
        let now = SystemTime::now();
        state.record_success(2, "newer".into(), sample_response("req-2"), now, true);
        state.record_success(1, "older".into(), sample_response("req-1"), now, false);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.current().map(|r| r.request_id.as_str()), Some("req-2"));
        assert_eq!(state.last_applied_seq(), 2);
    }

    #[test]
    fn begin_clears_error_and_counts_in_flight() {
        let mut state = ViewState::default();
        state.record_failure(SUBMIT_ERROR_MESSAGE);
        state.begin_submission();
        state.begin_submission();
        assert!(state.error().is_none());
        assert_eq!(state.in_flight(), 2);
        state.finish_submission();
        assert!(state.is_loading());
        state.finish_submission();
        state.finish_submission();
        assert!(!state.is_loading());
    }

    #[test]
    fn current_item_matches_by_identity() {
        let mut state = ViewState::default();
        let now = SystemTime::now();
        state.record_success(1, "a".into(), sample_response("unknown"), now, true);
        state.record_success(2, "b".into(), sample_response("unknown"), now, true);
        state.select_history_at(1).expect("select");
        assert_eq!(state.current_item().map(|item| item.query.as_str()), Some("a"));
    }

    #[test]
    fn health_indicator_tracks_latest_probe() {
        let mut state = ViewState::default();
        assert_eq!(state.health_indicator(), HealthIndicator::Pending);
        state.set_health(HealthStatus::error());
        assert_eq!(state.health_indicator(), HealthIndicator::Unreachable);
    }

    #[test]
    fn timestamps_are_rfc3339_millis() {
        let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let formatted = format_timestamp(time);
        assert_eq!(formatted, "2023-11-14T22:13:20.123Z");
        assert_eq!(clock_time(&formatted), "22:13:20");
    }
}
