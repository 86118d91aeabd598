mod health;
mod submit;
#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;
use std::time::Duration;

use router_client::RouterApi;
use router_protocol::config::SubmissionOrdering;
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use crate::events::ViewEvent;
use crate::state::ViewState;

use health::HealthPoller;
pub(crate) use submit::InputSubmission;
use submit::QueryController;

const EVENT_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug)]
pub(crate) struct ViewOptions {
    pub(crate) health_interval: Duration,
    pub(crate) ordering: SubmissionOrdering,
}

/// One console session: shared state, background health polling and the
/// submission controller, all tied to a single cancellation token.
pub(crate) struct RouterView {
    state: Arc<RwLock<ViewState>>,
    event_tx: broadcast::Sender<ViewEvent>,
    live: CancellationToken,
    poller: HealthPoller,
    controller: QueryController,
}

impl RouterView {
    pub(crate) fn new(api: Arc<dyn RouterApi>, options: ViewOptions) -> Self {
        let state = Arc::new(RwLock::new(ViewState::default()));
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let live = CancellationToken::new();
        let poller = HealthPoller::new(
            Arc::clone(&api),
            Arc::clone(&state),
            event_tx.clone(),
            options.health_interval,
            live.child_token(),
        );
        let controller = QueryController::new(
            api,
            Arc::clone(&state),
            event_tx.clone(),
            live.clone(),
            options.ordering,
        );
        Self {
            state,
            event_tx,
            live,
            poller,
            controller,
        }
    }

    pub(crate) fn start(&mut self) {
        if self.live.is_cancelled() {
            return;
        }
        self.poller.start();
        tracing::info!("router view started");
    }

    /// Stops polling and fences off every in-flight request. After this
    /// returns the view state no longer changes.
    pub(crate) async fn stop(&mut self) {
        if self.live.is_cancelled() {
            return;
        }
        self.poller.stop().await;
        {
            let _state = self.state.write().await;
            self.live.cancel();
        }
        tracing::info!("router view stopped");
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn state(&self) -> Arc<RwLock<ViewState>> {
        Arc::clone(&self.state)
    }

    pub(crate) fn controller(&self) -> QueryController {
        self.controller.clone()
    }

    #[cfg(test)]
    pub(crate) fn poller_phase(&self) -> health::PollerPhase {
        self.poller.phase()
    }

    pub(crate) fn shutdown_token(&self) -> CancellationToken {
        self.live.clone()
    }
}
