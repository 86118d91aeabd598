use std::sync::Arc;
use std::time::Duration;

use router_client::RouterApi;
use router_protocol::HealthStatus;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::events::ViewEvent;
use crate::state::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PollerPhase {
    Idle,
    Polling,
    Stopped,
}

/// Periodic backend liveness probe feeding the status indicator.
///
/// Every tick spawns its own probe, so a slow backend never delays the
/// schedule. Probes only write while the poller token is live; `stop` cancels
/// the token under the state write lock, so nothing lands after it returns.
pub(crate) struct HealthPoller {
    api: Arc<dyn RouterApi>,
    state: Arc<RwLock<ViewState>>,
    event_tx: broadcast::Sender<ViewEvent>,
    period: Duration,
    token: CancellationToken,
    phase: PollerPhase,
    task: Option<JoinHandle<()>>,
}

impl HealthPoller {
    pub(crate) fn new(
        api: Arc<dyn RouterApi>,
        state: Arc<RwLock<ViewState>>,
        event_tx: broadcast::Sender<ViewEvent>,
        period: Duration,
        token: CancellationToken,
    ) -> Self {
        Self {
            api,
            state,
            event_tx,
            period,
            token,
            phase: PollerPhase::Idle,
            task: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> PollerPhase {
        self.phase
    }

    pub(crate) fn start(&mut self) {
        if self.phase != PollerPhase::Idle {
            return;
        }
        self.phase = PollerPhase::Polling;
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();
        let token = self.token.clone();
        let period = self.period;
        tracing::debug!(period_ms = period.as_millis() as u64, "health poller started");
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        spawn_probe(
                            Arc::clone(&api),
                            Arc::clone(&state),
                            event_tx.clone(),
                            token.clone(),
                        );
                    }
                }
            }
            tracing::debug!("health poller stopped");
        }));
    }

    pub(crate) async fn stop(&mut self) {
        if self.phase == PollerPhase::Stopped {
            return;
        }
        {
            let _state = self.state.write().await;
            self.token.cancel();
        }
        self.phase = PollerPhase::Stopped;
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "health poller task ended abnormally");
            }
        }
    }
}

fn spawn_probe(
    api: Arc<dyn RouterApi>,
    state: Arc<RwLock<ViewState>>,
    event_tx: broadcast::Sender<ViewEvent>,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        let status = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            status = api.fetch_health() => status,
        };
        apply_health(&state, &event_tx, &token, status).await;
    });
}

/// Stores a probe result unless the poller has stopped. Returns whether it was applied.
pub(crate) async fn apply_health(
    state: &RwLock<ViewState>,
    event_tx: &broadcast::Sender<ViewEvent>,
    token: &CancellationToken,
    status: HealthStatus,
) -> bool {
    let indicator = {
        let mut state = state.write().await;
        if token.is_cancelled() {
            tracing::debug!("discarding health probe that finished after stop");
            return false;
        }
        state.set_health(status.clone());
        state.health_indicator()
    };
    tracing::debug!(status = %status.status, model = %status.model, "health probe applied");
    let _ = event_tx.send(ViewEvent::HealthChanged { indicator, status });
    true
}
