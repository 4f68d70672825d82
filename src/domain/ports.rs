use crate::domain::model::{EnrichmentMap, EnrichmentResult, ListingRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub trait Storage: Send + Sync {
    /// Creates or overwrites `path` (relative to the storage root) and returns its full location.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn listing_endpoint(&self) -> &str;
    fn api_key(&self) -> &str;
    fn detail_url_template(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn timeout_seconds(&self) -> u64;

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }
}

/// 單筆詳細頁抓取失敗的原因；只在 worker pool 內部流通
#[derive(Error, Debug)]
pub enum DetailFetchFailure {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid detail URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for DetailFetchFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DetailFetchFailure::Timeout
        } else {
            DetailFetchFailure::Request(err)
        }
    }
}

/// Source of per-record enrichment. Implementations report failures as values and never panic.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(
        &self,
        code: &str,
    ) -> std::result::Result<EnrichmentResult, DetailFetchFailure>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ListingRecord>>;
    /// Never fails: per-record failures degrade to empty fields.
    async fn enrich(&self, listings: &[ListingRecord]) -> EnrichmentMap;
    async fn load(&self, listings: Vec<ListingRecord>, enrichment: EnrichmentMap) -> Result<String>;
}
