use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use router_protocol::{
    FeedbackRequest, HealthStatus, RouteRequest, RouterResponse, FEEDBACK_PATH, HEALTH_PATH,
    ROUTE_PATH,
};
use serde::Serialize;

use crate::error::ClientError;
use crate::http_utils::{join_base_path, log_excerpt, normalize_base_url};

/// The three backend calls the console depends on.
#[async_trait]
pub trait RouterApi: Send + Sync {
    /// Best-effort liveness probe. Failures come back as [`HealthStatus::error`].
    async fn fetch_health(&self) -> HealthStatus;

    async fn submit_query(&self, query: &str) -> Result<RouterResponse, ClientError>;

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), ClientError>;
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    next_call: AtomicU64,
}

struct HttpResponse {
    status: u16,
    body: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        let http = Client::builder()
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            timeout,
            next_call: AtomicU64::new(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self, path: &str) -> Result<HttpResponse, ClientError> {
        self.request::<()>(Method::GET, path, None).await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<HttpResponse, ClientError> {
        self.request(Method::POST, path, Some(payload)).await
    }

    async fn request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> Result<HttpResponse, ClientError> {
        let call = self.next_call.fetch_add(1, Ordering::Relaxed);
        let url = join_base_path(&self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);
        if let Some(payload) = payload {
            let body = serde_json::to_string(payload)?;
            tracing::debug!(call, %method, %url, body_len = body.len(), "http request start");
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        } else {
            tracing::debug!(call, %method, %url, "http request start");
        }

        let response = request.send().await.map_err(|err| {
            tracing::debug!(
                call,
                timeout = err.is_timeout(),
                connect = err.is_connect(),
                error = %err,
                "http request failed"
            );
            ClientError::from(err)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(
            call,
            status,
            body_len = body.len(),
            body = %log_excerpt(&body),
            "http response"
        );
        if status / 100 != 2 {
            return Err(ClientError::Status { status });
        }
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl RouterApi for ApiClient {
    async fn fetch_health(&self) -> HealthStatus {
        let response = match self.get(HEALTH_PATH).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                return HealthStatus::error();
            }
        };
        match serde_json::from_str::<HealthStatus>(&response.body) {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(status = response.status, error = %err, "health payload invalid");
                HealthStatus::error()
            }
        }
    }

    async fn submit_query(&self, query: &str) -> Result<RouterResponse, ClientError> {
        let payload = RouteRequest {
            query: query.to_string(),
        };
        let response = self.post(ROUTE_PATH, &payload).await?;
        let decoded = serde_json::from_str(&response.body)?;
        Ok(decoded)
    }

    async fn submit_feedback(&self, feedback: &FeedbackRequest) -> Result<(), ClientError> {
        self.post(FEEDBACK_PATH, feedback).await?;
        Ok(())
    }
}
