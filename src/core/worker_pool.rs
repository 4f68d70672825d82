use crate::domain::model::{EnrichmentMap, EnrichmentResult};
use crate::domain::ports::DetailSource;
use futures::stream::{self, StreamExt};

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Runs `source` for every code with at most `limit` fetches in flight.
///
/// Each in-flight fetch yields a `(code, outcome)` pair to this single loop, which is the
/// only writer of the map. Failures become empty results here and are only logged.
/// Returns once every dispatched fetch has resolved.
pub async fn enrich_all<D>(source: &D, codes: &[String], limit: usize) -> EnrichmentMap
where
    D: DetailSource + ?Sized,
{
    let limit = limit.max(1);
    let mut map = EnrichmentMap::with_capacity(codes.len());
    let mut failures = 0usize;

    tracing::info!(
        "🔎 Enriching {} records ({} concurrent requests)",
        codes.len(),
        limit
    );

    let mut completions = stream::iter(codes.iter().cloned())
        .map(|code| async move {
            let outcome = source.fetch_detail(&code).await;
            (code, outcome)
        })
        .buffer_unordered(limit);

    while let Some((code, outcome)) = completions.next().await {
        let enrichment = match outcome {
            Ok(enrichment) => enrichment,
            Err(failure) => {
                failures += 1;
                tracing::debug!("Detail fetch for {} failed: {}", code, failure);
                EnrichmentResult::default()
            }
        };
        map.insert(code, enrichment);
    }

    tracing::info!(
        "✅ Enrichment complete: {} with data, {} empty, {} failed requests",
        map.enriched_count(),
        map.len() - map.enriched_count(),
        failures
    );
    map
}
