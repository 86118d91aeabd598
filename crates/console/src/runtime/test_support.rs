use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use router_client::{ClientError, RouterApi};
use router_protocol::{
    ClassificationOutput, Domain, FeedbackRequest, HealthStatus, RiskLevel, RouterResponse,
    SafetyFlags,
};
use tokio::sync::oneshot;

pub(crate) fn sample_response(request_id: &str) -> RouterResponse {
    RouterResponse {
        response: format!("answer for {request_id}"),
        classification: ClassificationOutput {
            domain: Domain::General,
            risk_level: RiskLevel::Low,
            needs_disclaimer: false,
            self_harm: false,
            illegal_request: false,
            reasoning: "general question".to_string(),
        },
        disclaimers: Vec::new(),
        safety_flags: SafetyFlags::default(),
        request_id: request_id.to_string(),
    }
}

pub(crate) fn random_response() -> RouterResponse {
    sample_response(&uuid::Uuid::new_v4().to_string())
}

pub(crate) fn ok_health() -> HealthStatus {
    HealthStatus {
        status: "ok".to_string(),
        model: "test-model".to_string(),
        langsmith_project: None,
    }
}

type RouteResult = Result<RouterResponse, ClientError>;

enum Scripted<T> {
    Ready(T),
    Gated(oneshot::Receiver<T>),
}

/// Scripted [`RouterApi`]. Each call pops the next scripted answer; gated
/// answers resolve when the test sends through the returned sender.
#[derive(Default)]
pub(crate) struct FakeApi {
    health: Mutex<VecDeque<Scripted<HealthStatus>>>,
    routes: Mutex<VecDeque<Scripted<RouteResult>>>,
    feedback: Mutex<Vec<FeedbackRequest>>,
    fail_feedback: bool,
    health_calls: AtomicUsize,
    route_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeApi {
    pub(crate) fn with_failing_feedback() -> Self {
        Self {
            fail_feedback: true,
            ..Self::default()
        }
    }

    pub(crate) fn push_health(&self, status: HealthStatus) {
        self.health
            .lock()
            .expect("health lock")
            .push_back(Scripted::Ready(status));
    }

    pub(crate) fn push_health_gate(&self) -> oneshot::Sender<HealthStatus> {
        let (tx, rx) = oneshot::channel();
        self.health
            .lock()
            .expect("health lock")
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn push_route(&self, result: RouteResult) {
        self.routes
            .lock()
            .expect("route lock")
            .push_back(Scripted::Ready(result));
    }

    pub(crate) fn push_route_gate(&self) -> oneshot::Sender<RouteResult> {
        let (tx, rx) = oneshot::channel();
        self.routes
            .lock()
            .expect("route lock")
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("query lock").clone()
    }

    pub(crate) fn feedback(&self) -> Vec<FeedbackRequest> {
        self.feedback.lock().expect("feedback lock").clone()
    }
}

#[async_trait]
impl RouterApi for FakeApi {
    async fn fetch_health(&self) -> HealthStatus {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.health.lock().expect("health lock").pop_front();
        match next {
            Some(Scripted::Ready(status)) => status,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| HealthStatus::error()),
            None => ok_health(),
        }
    }

    async fn submit_query(&self, query: &str) -> RouteResult {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("query lock")
            .push(query.to_string());
        let next = self.routes.lock().expect("route lock").pop_front();
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Transport("gate dropped".to_string()))),
            None => Err(ClientError::Transport("no scripted response".to_string())),
        }
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), ClientError> {
        if self.fail_feedback {
            return Err(ClientError::Status { status: 503 });
        }
        self.feedback
            .lock()
            .expect("feedback lock")
            .push(feedback.clone());
        Ok(())
    }
}

/// Yields until `check` holds, so spawned tasks can reach their next await.
pub(crate) async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if check() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub(crate) async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
