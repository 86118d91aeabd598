use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use router_client::RouterApi;
use router_protocol::config::SubmissionOrdering;
use router_protocol::{FeedbackRequest, Rating};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::ViewEvent;
use crate::input::Query;
use crate::state::{HistoryItem, ViewState, SUBMIT_ERROR_MESSAGE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SubmitOutcome {
    /// Response shown as the current result and added to history.
    Applied,
    /// Response superseded by a newer submission; history only.
    Recorded,
    Failed,
    /// Failure of a superseded submission; no error shown.
    StaleFailure,
    /// The view stopped before the response arrived.
    Discarded,
}

enum Admission {
    Started { seq: u64, in_flight: usize },
    Busy,
    Stopped,
}

#[derive(Debug)]
pub(crate) enum InputSubmission {
    Started(JoinHandle<SubmitOutcome>),
    /// A previous question is still being routed.
    Busy,
    Stopped,
}

/// Owns the submit/select/feedback operations against shared view state.
///
/// Submissions are not serialized. Each one takes a sequence number; with
/// [`SubmissionOrdering::LatestSubmission`] a response only becomes current
/// when no newer submission has been applied yet.
#[derive(Clone)]
pub(crate) struct QueryController {
    api: Arc<dyn RouterApi>,
    state: Arc<RwLock<ViewState>>,
    event_tx: broadcast::Sender<ViewEvent>,
    live: CancellationToken,
    ordering: SubmissionOrdering,
    next_seq: Arc<AtomicU64>,
}

impl QueryController {
    pub(crate) fn new(
        api: Arc<dyn RouterApi>,
        state: Arc<RwLock<ViewState>>,
        event_tx: broadcast::Sender<ViewEvent>,
        live: CancellationToken,
        ordering: SubmissionOrdering,
    ) -> Self {
        Self {
            api,
            state,
            event_tx,
            live,
            ordering,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Submits without waiting for earlier submissions; overlapping calls race
    /// under the configured ordering policy.
    #[cfg(test)]
    pub(crate) async fn submit(&self, query: Query) -> SubmitOutcome {
        match self.begin(false).await {
            Admission::Started { seq, in_flight } => self.complete(seq, in_flight, query).await,
            Admission::Busy | Admission::Stopped => SubmitOutcome::Discarded,
        }
    }

    /// Entry point for the input line, refused while any submission is in
    /// flight. The busy check and loading entry share one write lock.
    pub(crate) async fn submit_from_input(&self, query: Query) -> InputSubmission {
        match self.begin(true).await {
            Admission::Started { seq, in_flight } => {
                let controller = self.clone();
                InputSubmission::Started(tokio::spawn(async move {
                    controller.complete(seq, in_flight, query).await
                }))
            }
            Admission::Busy => InputSubmission::Busy,
            Admission::Stopped => InputSubmission::Stopped,
        }
    }

    async fn begin(&self, exclusive: bool) -> Admission {
        let mut state = self.state.write().await;
        if self.live.is_cancelled() {
            return Admission::Stopped;
        }
        if exclusive && state.is_loading() {
            return Admission::Busy;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        state.begin_submission();
        Admission::Started {
            seq,
            in_flight: state.in_flight(),
        }
    }

    async fn complete(&self, seq: u64, in_flight: usize, query: Query) -> SubmitOutcome {
        tracing::info!(seq, query_len = query.as_str().len(), "query submitted");
        let _ = self.event_tx.send(ViewEvent::SubmissionStarted {
            query: query.as_str().to_string(),
            in_flight,
        });

        let result = tokio::select! {
            biased;
            _ = self.live.cancelled() => {
                tracing::debug!(seq, "view stopped while query was in flight");
                return SubmitOutcome::Discarded;
            }
            result = self.api.submit_query(query.as_str()) => result,
        };
        let received_at = SystemTime::now();

        let mut state = self.state.write().await;
        if self.live.is_cancelled() {
            return SubmitOutcome::Discarded;
        }
        state.finish_submission();
        let superseded = self.ordering == SubmissionOrdering::LatestSubmission
            && seq < state.last_applied_seq();
        match result {
            Ok(response) => {
                let item = state.record_success(
                    seq,
                    query.into_string(),
                    response,
                    received_at,
                    !superseded,
                );
                drop(state);
                tracing::info!(
                    seq,
                    request_id = %item.id,
                    domain = item.result.classification.domain.as_str(),
                    risk = item.result.classification.risk_level.as_str(),
                    superseded,
                    "query routed"
                );
                if superseded {
                    let _ = self.event_tx.send(ViewEvent::ResultRecorded { item });
                    SubmitOutcome::Recorded
                } else {
                    let _ = self.event_tx.send(ViewEvent::ResultChanged { item });
                    SubmitOutcome::Applied
                }
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, superseded, "query submission failed");
                if superseded {
                    return SubmitOutcome::StaleFailure;
                }
                state.record_failure(SUBMIT_ERROR_MESSAGE);
                drop(state);
                let _ = self.event_tx.send(ViewEvent::SubmissionFailed {
                    message: SUBMIT_ERROR_MESSAGE.to_string(),
                });
                SubmitOutcome::Failed
            }
        }
    }

    pub(crate) async fn select_history(&self, id: &str) -> bool {
        let item = self.state.write().await.select_history(id);
        self.announce_selection(item)
    }

    pub(crate) async fn select_history_at(&self, index: usize) -> bool {
        let item = self.state.write().await.select_history_at(index);
        self.announce_selection(item)
    }

    fn announce_selection(&self, item: Option<HistoryItem>) -> bool {
        match item {
            Some(item) => {
                let _ = self.event_tx.send(ViewEvent::HistorySelected { item });
                true
            }
            None => false,
        }
    }

    /// Rates the current result in the background. Returns `None` when there
    /// is nothing to rate.
    pub(crate) async fn send_feedback(&self, rating: Rating) -> Option<JoinHandle<()>> {
        let feedback = {
            let state = self.state.read().await;
            let item = state.current_item()?;
            FeedbackRequest {
                request_id: item.id.clone(),
                query: item.query.clone(),
                response: item.result.response.clone(),
                rating,
            }
        };
        let api = Arc::clone(&self.api);
        let event_tx = self.event_tx.clone();
        let live = self.live.clone();
        Some(tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = live.cancelled() => return,
                result = api.submit_feedback(&feedback) => result,
            };
            match result {
                Ok(()) => {
                    tracing::info!(request_id = %feedback.request_id, ?rating, "feedback sent");
                    let _ = event_tx.send(ViewEvent::FeedbackAccepted {
                        request_id: feedback.request_id,
                        rating,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        request_id = %feedback.request_id,
                        error = %err,
                        "feedback submission failed"
                    );
                }
            }
        }))
    }
}
