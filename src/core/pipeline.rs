use crate::adapters::http::{build_client, HtmlDetailFetcher, ListingReader};
use crate::core::merge::{merge_rows, rows_to_csv};
use crate::core::worker_pool::enrich_all;
use crate::core::{ConfigProvider, DetailSource, EnrichmentMap, ListingRecord, Pipeline, Storage};
use crate::utils::error::Result;

/// 招標清單 → 詳細頁補充 → CSV 的管道
pub struct LicitacionesPipeline<S: Storage, C: ConfigProvider, D: DetailSource = HtmlDetailFetcher> {
    storage: S,
    config: C,
    reader: ListingReader,
    details: D,
}

impl<S: Storage, C: ConfigProvider> LicitacionesPipeline<S, C, HtmlDetailFetcher> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = build_client()?;
        let details = HtmlDetailFetcher::from_config(client.clone(), &config)?;
        Ok(Self {
            reader: ListingReader::from_config(client, &config),
            storage,
            config,
            details,
        })
    }
}

impl<S: Storage, C: ConfigProvider, D: DetailSource> LicitacionesPipeline<S, C, D> {
    /// Uses a custom enrichment source instead of scraping the detail pages.
    pub fn with_detail_source(storage: S, config: C, details: D) -> Result<Self> {
        Ok(Self {
            reader: ListingReader::from_config(build_client()?, &config),
            storage,
            config,
            details,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, D: DetailSource> Pipeline for LicitacionesPipeline<S, C, D> {
    async fn extract(&self) -> Result<Vec<ListingRecord>> {
        tracing::info!(
            "🚀 Fetching tender listing from: {}",
            self.config.listing_endpoint()
        );

        let listings = self.reader.fetch_listings().await?;

        tracing::info!("📊 Extracted {} listing records", listings.len());
        Ok(listings)
    }

    async fn enrich(&self, listings: &[ListingRecord]) -> EnrichmentMap {
        let codes: Vec<String> = listings.iter().map(|l| l.external_code.clone()).collect();
        enrich_all(&self.details, &codes, self.config.concurrent_requests()).await
    }

    async fn load(&self, listings: Vec<ListingRecord>, enrichment: EnrichmentMap) -> Result<String> {
        let rows = merge_rows(&listings, &enrichment);
        let data = rows_to_csv(&rows)?;

        tracing::debug!("Writing {} rows ({} bytes)", rows.len(), data.len());
        let output_path = self
            .storage
            .write_file(self.config.output_file(), &data)
            .await?;

        tracing::info!("💾 Wrote {} rows to {}", rows.len(), output_path);
        Ok(output_path)
    }
}
