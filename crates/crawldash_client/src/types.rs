use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// `GET /health` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Per-component reachability, e.g. `{"api": "UP", "redis": "DOWN"}`.
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `POST /crawl/` response body; the server may append fields we ignore.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrawlAccepted {
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /task/{id}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskStatusResponse {
    pub status: String,
}

/// `GET /urls/{id}/{domain}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlListResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Transport-level failure of one request. Never retried here; recovery
/// policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    /// Non-success HTTP status; `detail` is the server's own explanation
    /// when the error body carried one (`{"detail": ...}`).
    #[error("server returned {code}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { code: u16, detail: Option<String> },
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::Timeout;
        }
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        ApiError::Network(err.to_string())
    }
}
