//! Remote task client: typed wrappers over the crawler service's HTTP
//! contract and the background runtime that executes them.
mod api;
mod handle;
mod types;

pub use api::{ClientSettings, CrawlerApi, ReqwestCrawlerApi};
pub use handle::{ClientCommand, ClientEvent, ClientHandle};
pub use types::{ApiError, CrawlAccepted, HealthResponse, TaskStatusResponse, UrlListResponse};
