use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// 上游 API 回傳的一筆招標資料
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "CodigoExterno", default, deserialize_with = "lenient_string")]
    pub external_code: String,
    #[serde(rename = "Nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "CodigoEstado", default, deserialize_with = "lenient_string")]
    pub status_code: String,
    #[serde(rename = "FechaCierre", default, deserialize_with = "lenient_string")]
    pub closing_date: String,
}

/// Body of the bulk listing endpoint. Only `Listado` is consumed.
#[derive(Debug, Default, Deserialize)]
pub struct ListingResponse {
    #[serde(rename = "Listado", default, deserialize_with = "nullable_listing")]
    pub listado: Vec<ListingRecord>,
}

// 字串照原樣保留；數字 (例如 CodigoEstado: 5) 轉成文字。
// 布林、物件、陣列與 null 不屬於這些欄位的合理值，一律視為空字串。
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn nullable_listing<'de, D>(deserializer: D) -> std::result::Result<Vec<ListingRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ListingRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields scraped from one detail page. Empty strings mean "not found or fetch failed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub status: String,
    pub description: String,
}

impl EnrichmentResult {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty() && self.description.is_empty()
    }
}

/// `CodigoExterno` -> enrichment. A missing key reads as an empty result.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentMap {
    entries: HashMap<String, EnrichmentResult>,
}

impl EnrichmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Last write wins for a repeated code.
    pub fn insert(&mut self, code: String, result: EnrichmentResult) {
        self.entries.insert(code, result);
    }

    pub fn get(&self, code: &str) -> Option<&EnrichmentResult> {
        self.entries.get(code)
    }

    pub fn lookup(&self, code: &str) -> EnrichmentResult {
        self.entries.get(code).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn enriched_count(&self) -> usize {
        self.entries.values().filter(|r| !r.is_empty()).count()
    }
}

impl FromIterator<(String, EnrichmentResult)> for EnrichmentMap {
    fn from_iter<I: IntoIterator<Item = (String, EnrichmentResult)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// 輸出 CSV 的一列，欄位順序即輸出順序
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "CodigoExterno")]
    pub external_code: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "CodigoEstado")]
    pub status_code: String,
    #[serde(rename = "FechaCierre")]
    pub closing_date: String,
    #[serde(rename = "Estado")]
    pub status: String,
    #[serde(rename = "Descripcion")]
    pub description: String,
}

impl OutputRow {
    pub const HEADERS: [&'static str; 6] = [
        "CodigoExterno",
        "Nombre",
        "CodigoEstado",
        "FechaCierre",
        "Estado",
        "Descripcion",
    ];

    pub fn from_parts(listing: &ListingRecord, enrichment: EnrichmentResult) -> Self {
        Self {
            external_code: listing.external_code.clone(),
            name: listing.name.clone(),
            status_code: listing.status_code.clone(),
            closing_date: listing.closing_date.clone(),
            status: enrichment.status,
            description: enrichment.description,
        }
    }
}
