use crate::domain::model::EnrichmentResult;
use crate::utils::error::{EtlError, Result};
use scraper::{Html, Selector};

pub const STATUS_ELEMENT_ID: &str = "lblFicha1Estado";
pub const DESCRIPTION_ELEMENT_ID: &str = "lblFicha1Descripcion";

/// 詳細頁的「Estado」與「Descripción」選擇器，建立一次後重複使用
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    status: Selector,
    description: Selector,
}

impl DetailExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            status: id_selector(STATUS_ELEMENT_ID)?,
            description: id_selector(DESCRIPTION_ELEMENT_ID)?,
        })
    }

    /// 找不到的元素視為空字串
    pub fn extract(&self, html: &str) -> EnrichmentResult {
        let document = Html::parse_document(html);

        let status = element_text(&document, &self.status)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        let description = element_text(&document, &self.description)
            .map(|text| normalize_whitespace(&text))
            .unwrap_or_default();

        EnrichmentResult {
            status,
            description,
        }
    }
}

/// Collapses every whitespace run (newlines and tabs included) into one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn id_selector(id: &str) -> Result<Selector> {
    let css = format!("[id=\"{}\"]", id);
    Selector::parse(&css).map_err(|e| EtlError::ConfigError {
        message: format!("Invalid selector {}: {}", css, e),
    })
}

fn element_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
}
