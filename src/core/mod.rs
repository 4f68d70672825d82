pub mod etl;
pub mod merge;
pub mod pipeline;
pub mod worker_pool;

pub use crate::domain::model::{EnrichmentMap, EnrichmentResult, ListingRecord, OutputRow};
pub use crate::domain::ports::{ConfigProvider, DetailSource, Pipeline, Storage};
pub use crate::utils::error::Result;
