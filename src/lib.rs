pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HtmlDetailFetcher, ListingReader, LocalStorage};
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::LicitacionesPipeline};
pub use domain::model::{EnrichmentMap, EnrichmentResult, ListingRecord, OutputRow};
pub use domain::ports::{ConfigProvider, DetailFetchFailure, DetailSource, Pipeline, Storage};
pub use utils::error::{EtlError, Result};
