use crate::adapters::html::DetailExtractor;
use crate::domain::model::{EnrichmentResult, ListingRecord, ListingResponse};
use crate::domain::ports::{ConfigProvider, DetailFetchFailure, DetailSource};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::CODE_PLACEHOLDER;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("licitaciones-etl/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| EtlError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// 一次性讀取上游招標清單，不重試
#[derive(Debug, Clone)]
pub struct ListingReader {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl ListingReader {
    pub fn new(client: Client, endpoint: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self::new(
            client,
            config.listing_endpoint(),
            config.api_key(),
            config.request_timeout(),
        )
    }

    pub async fn fetch_listings(&self) -> Result<Vec<ListingRecord>> {
        tracing::debug!("Making listing request to: {}", self.endpoint);

        // 錯誤訊息不可帶出含 ticket 的完整網址
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("ticket", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| EtlError::upstream(&self.endpoint, e.without_url().to_string()))?;

        let status = response.status();
        tracing::debug!("Listing response status: {}", status);
        if !status.is_success() {
            return Err(EtlError::upstream(
                &self.endpoint,
                format!("HTTP status {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| EtlError::upstream(&self.endpoint, e.without_url().to_string()))?;

        let parsed: ListingResponse = serde_json::from_slice(&body).map_err(|e| {
            EtlError::upstream(&self.endpoint, format!("invalid JSON body: {}", e))
        })?;

        Ok(parsed.listado)
    }
}

/// Fetches the public detail page of one tender and scrapes status and description.
#[derive(Debug, Clone)]
pub struct HtmlDetailFetcher {
    client: Client,
    url_template: String,
    timeout: Duration,
    extractor: DetailExtractor,
}

impl HtmlDetailFetcher {
    pub fn new(client: Client, url_template: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client,
            url_template: url_template.to_string(),
            timeout,
            extractor: DetailExtractor::new()?,
        })
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Result<Self> {
        Self::new(client, config.detail_url_template(), config.request_timeout())
    }

    pub fn detail_url(&self, code: &str) -> std::result::Result<Url, DetailFetchFailure> {
        let encoded: String = url::form_urlencoded::byte_serialize(code.as_bytes()).collect();
        let raw = self.url_template.replace(CODE_PLACEHOLDER, &encoded);
        Url::parse(&raw).map_err(|e| DetailFetchFailure::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

#[async_trait]
impl DetailSource for HtmlDetailFetcher {
    async fn fetch_detail(
        &self,
        code: &str,
    ) -> std::result::Result<EnrichmentResult, DetailFetchFailure> {
        let url = self.detail_url(code)?;
        let response = self.client.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetailFetchFailure::Status(status.as_u16()));
        }

        let html = response.text().await?;
        Ok(self.extractor.extract(&html))
    }
}
