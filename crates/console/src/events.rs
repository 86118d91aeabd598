use crate::state::{HealthIndicator, HistoryItem};
use router_protocol::{HealthStatus, Rating};

#[derive(Clone, Debug)]
pub(crate) enum ViewEvent {
    HealthChanged {
        indicator: HealthIndicator,
        status: HealthStatus,
    },
    SubmissionStarted {
        query: String,
        in_flight: usize,
    },
    /// A response became the current result.
    ResultChanged { item: HistoryItem },
    /// A superseded response was kept in history without being displayed.
    ResultRecorded { item: HistoryItem },
    SubmissionFailed { message: String },
    HistorySelected { item: HistoryItem },
    FeedbackAccepted { request_id: String, rating: Rating },
}
