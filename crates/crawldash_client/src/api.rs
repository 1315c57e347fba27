use std::time::Duration;

use serde::Serialize;

use crate::types::{ApiError, CrawlAccepted, HealthResponse, TaskStatusResponse, UrlListResponse};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the crawler service, with or without a trailing slash.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Typed access to the five crawler endpoints. One method per endpoint, no
/// caching, no retries.
#[async_trait::async_trait]
pub trait CrawlerApi: Send + Sync {
    async fn check_health(&self) -> Result<HealthResponse, ApiError>;
    async fn start_crawl(
        &self,
        domains: &[String],
        max_depth: u8,
    ) -> Result<CrawlAccepted, ApiError>;
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, ApiError>;
    async fn cancel_task(&self, task_id: &str) -> Result<(), ApiError>;
    async fn list_urls(&self, task_id: &str, domain: &str) -> Result<UrlListResponse, ApiError>;
}

#[derive(Serialize)]
struct CrawlRequest<'a> {
    domains: &'a [String],
    max_depth: u8,
}

#[derive(Debug, Clone)]
pub struct ReqwestCrawlerApi {
    base: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestCrawlerApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        // A missing trailing slash would make Url::join drop the last path
        // segment of the base.
        let mut base_url = settings.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = reqwest::Url::parse(&base_url)
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))
    }
}

/// Map a non-success response to `ApiError::Status`, pulling the server's
/// `detail` message out of the error body when one is present.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = match response.text().await {
        Ok(body) => serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("detail").cloned())
            .and_then(|detail| match detail {
                serde_json::Value::String(text) => Some(text),
                other => Some(other.to_string()),
            }),
        Err(_) => None,
    };
    Err(ApiError::Status {
        code: status.as_u16(),
        detail,
    })
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait::async_trait]
impl CrawlerApi for ReqwestCrawlerApi {
    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint("health")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_json(check_status(response).await?).await
    }

    async fn start_crawl(
        &self,
        domains: &[String],
        max_depth: u8,
    ) -> Result<CrawlAccepted, ApiError> {
        let url = self.endpoint("crawl/")?;
        let response = self
            .client
            .post(url)
            .json(&CrawlRequest { domains, max_depth })
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_json(check_status(response).await?).await
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, ApiError> {
        let url = self.endpoint(&format!("task/{task_id}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_json(check_status(response).await?).await
    }

    async fn cancel_task(&self, task_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("task/{task_id}"))?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        // The acknowledgment body carries nothing we act on.
        check_status(response).await?;
        Ok(())
    }

    async fn list_urls(&self, task_id: &str, domain: &str) -> Result<UrlListResponse, ApiError> {
        let url = self.endpoint(&format!("urls/{task_id}/{domain}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_json(check_status(response).await?).await
    }
}
