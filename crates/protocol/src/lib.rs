use serde::{Deserialize, Serialize};

pub mod config;

pub const HEALTH_PATH: &str = "/api/health";
pub const ROUTE_PATH: &str = "/api/route";
pub const FEEDBACK_PATH: &str = "/api/feedback";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Medical,
    Legal,
    General,
    #[serde(other)]
    Unknown,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Medical => "medical",
            Domain::Legal => "legal",
            Domain::General => "general",
            Domain::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Server-side domain/risk assessment attached to every routed answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationOutput {
    pub domain: Domain,
    pub risk_level: RiskLevel,
    pub needs_disclaimer: bool,
    pub self_harm: bool,
    pub illegal_request: bool,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetyFlags {
    pub self_harm: bool,
    pub illegal_request: bool,
    pub high_risk: bool,
}

impl SafetyFlags {
    /// Self-harm or illegal content, shown as a "Flagged" badge.
    pub fn is_flagged(&self) -> bool {
        self.self_harm || self.illegal_request
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouterResponse {
    pub response: String,
    pub classification: ClassificationOutput,
    #[serde(default)]
    pub disclaimers: Vec<String>,
    pub safety_flags: SafetyFlags,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteRequest {
    pub query: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub request_id: String,
    pub query: String,
    pub response: String,
    pub rating: Rating,
}

pub const HEALTH_OK: &str = "ok";
pub const HEALTH_ERROR: &str = "error";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub langsmith_project: Option<String>,
}

impl HealthStatus {
    /// Sentinel used when the backend could not be reached or answered garbage.
    pub fn error() -> Self {
        Self {
            status: HEALTH_ERROR.to_string(),
            model: "unknown".to_string(),
            langsmith_project: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_OK
    }
}
