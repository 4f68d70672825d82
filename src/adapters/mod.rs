// Adapters layer: concrete implementations for external systems (upstream API, detail pages, storage).

pub mod html;
pub mod http;
pub mod storage;

pub use http::{build_client, HtmlDetailFetcher, ListingReader};
pub use storage::LocalStorage;
