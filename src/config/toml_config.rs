use crate::config::{
    validate_settings, API_KEY_ENV, DEFAULT_CONCURRENCY, DEFAULT_DETAIL_URL_TEMPLATE,
    DEFAULT_LISTING_ENDPOINT, DEFAULT_OUTPUT_FILE, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_listing_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default = "default_detail_url_template")]
    pub url_template: String,
    #[serde(default = "default_concurrency")]
    pub concurrent_requests: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_listing_endpoint() -> String {
    DEFAULT_LISTING_ENDPOINT.to_string()
}

fn default_detail_url_template() -> String {
    DEFAULT_DETAIL_URL_TEMPLATE.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_listing_endpoint(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            url_template: default_detail_url_template(),
            concurrent_requests: default_concurrency(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_file: default_output_file(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
                message: format!("Cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置；未設定 api_key 時改讀環境變數
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 未被替換的 ${VAR} 視為未設定
        let unresolved = config
            .source
            .api_key
            .as_deref()
            .map(|key| key.trim().is_empty() || key.starts_with("${"))
            .unwrap_or(true);
        if unresolved {
            config.source.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${MERCADOPUBLICO_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn listing_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn api_key(&self) -> &str {
        self.source.api_key.as_deref().unwrap_or_default()
    }

    fn detail_url_template(&self) -> &str {
        &self.detail.url_template
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_file(&self) -> &str {
        &self.load.output_file
    }

    fn concurrent_requests(&self) -> usize {
        self.detail.concurrent_requests
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self, &self.source.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/licitaciones.json"
api_key = "abc-123"
timeout_seconds = 30

[detail]
url_template = "https://example.com/ficha?id={code}"
concurrent_requests = 4

[load]
output_path = "./test-output"
output_file = "tenders.csv"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.listing_endpoint(), "https://api.example.com/licitaciones.json");
        assert_eq!(config.api_key(), "abc-123");
        assert_eq!(config.timeout_seconds(), 30);
        assert_eq!(config.concurrent_requests(), 4);
        assert_eq!(config.output_file(), "tenders.csv");
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_default_to_upstream_values() {
        let config = TomlConfig::from_toml_str("[source]\napi_key = \"k\"\n").unwrap();

        assert_eq!(config.listing_endpoint(), DEFAULT_LISTING_ENDPOINT);
        assert_eq!(config.detail_url_template(), DEFAULT_DETAIL_URL_TEMPLATE);
        assert_eq!(config.concurrent_requests(), 10);
        assert_eq!(config.timeout_seconds(), 60);
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LICITACIONES_TEST_ENDPOINT", "https://test.api.com/l.json");

        let toml_content = r#"
[source]
endpoint = "${LICITACIONES_TEST_ENDPOINT}"
api_key = "k"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.endpoint, "https://test.api.com/l.json");

        std::env::remove_var("LICITACIONES_TEST_ENDPOINT");
    }

    #[test]
    fn test_invalid_template_fails_validation() {
        let toml_content = r#"
[source]
api_key = "k"

[detail]
url_template = "https://example.com/ficha"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[load]\noutput_path = \"./out\"\n[source]\napi_key = \"k\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./out");
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = TomlConfig::from_toml_str("[source]\napi_key = \"secret\"\n").unwrap();
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret"));
    }
}
