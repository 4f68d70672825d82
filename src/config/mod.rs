pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_required_field,
    validate_url, validate_url_template,
};

pub const API_KEY_ENV: &str = "MERCADOPUBLICO_API_KEY";
pub const DEFAULT_LISTING_ENDPOINT: &str =
    "https://api.mercadopublico.cl/servicios/v1/publico/licitaciones.json";
pub const DEFAULT_DETAIL_URL_TEMPLATE: &str =
    "https://www.mercadopublico.cl/Procurement/Modules/RFB/DetailsAcquisition.aspx?idlicitacion={code}";
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_OUTPUT_FILE: &str = "licitaciones.csv";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub use crate::core::worker_pool::DEFAULT_CONCURRENCY;

/// 兩種設定來源共用的檢查；缺少 API key 是啟動前的致命錯誤
pub(crate) fn validate_settings<C: ConfigProvider>(config: &C, api_key: &Option<String>) -> Result<()> {
    let key = validate_required_field(API_KEY_ENV, api_key)?;
    validate_non_empty_string(API_KEY_ENV, key)?;

    validate_url("listing_endpoint", config.listing_endpoint())?;
    validate_url_template("detail_url_template", config.detail_url_template())?;
    validate_path("output_path", config.output_path())?;
    validate_path("output_file", config.output_file())?;
    validate_range("concurrent_requests", config.concurrent_requests(), 1, 100)?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 600)?;

    tracing::debug!("Configuration validation passed");
    Ok(())
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use crate::utils::validation::Validate;
    use clap::Parser;

    #[derive(Clone, Parser)]
    #[command(name = "licitaciones-etl")]
    #[command(about = "Fetch Mercado Público tenders, enrich them from their detail pages and write a CSV")]
    pub struct CliConfig {
        #[arg(long, env = API_KEY_ENV, hide_env_values = true, help = "API access key (ticket)")]
        pub api_key: Option<String>,

        #[arg(long, default_value = DEFAULT_LISTING_ENDPOINT)]
        pub listing_endpoint: String,

        #[arg(long, default_value = DEFAULT_DETAIL_URL_TEMPLATE, help = "Detail page URL; {code} is replaced by CodigoExterno")]
        pub detail_url_template: String,

        #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
        pub output_path: String,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        pub output_file: String,

        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        pub concurrent_requests: usize,

        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS, help = "Per-request timeout in seconds")]
        pub timeout_seconds: u64,

        #[arg(short, long, help = "Load settings from a TOML file instead of flags")]
        pub config: Option<String>,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    // API key 不可出現在日誌中
    impl std::fmt::Debug for CliConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CliConfig")
                .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
                .field("listing_endpoint", &self.listing_endpoint)
                .field("detail_url_template", &self.detail_url_template)
                .field("output_path", &self.output_path)
                .field("output_file", &self.output_file)
                .field("concurrent_requests", &self.concurrent_requests)
                .field("timeout_seconds", &self.timeout_seconds)
                .field("config", &self.config)
                .field("monitor", &self.monitor)
                .finish()
        }
    }

    impl ConfigProvider for CliConfig {
        fn listing_endpoint(&self) -> &str {
            &self.listing_endpoint
        }

        fn api_key(&self) -> &str {
            self.api_key.as_deref().unwrap_or_default()
        }

        fn detail_url_template(&self) -> &str {
            &self.detail_url_template
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_file(&self) -> &str {
            &self.output_file
        }

        fn concurrent_requests(&self) -> usize {
            self.concurrent_requests
        }

        fn timeout_seconds(&self) -> u64 {
            self.timeout_seconds
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_settings(self, &self.api_key)
        }
    }

}
