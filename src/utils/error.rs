use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Upstream listing request to {endpoint} failed: {reason}")]
    UpstreamError { endpoint: String, reason: String },

    #[error("Failed to write output {path}: {source}")]
    OutputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn upstream(endpoint: &str, reason: impl Into<String>) -> Self {
        EtlError::UpstreamError {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::UpstreamError { .. } => ErrorCategory::Upstream,
            EtlError::OutputError { .. } | EtlError::CsvError(_) => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Upstream => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::UpstreamError { reason, .. } => {
                format!("無法取得招標清單 (listing fetch failed): {}", reason)
            }
            EtlError::OutputError { path, .. } => {
                format!("無法寫入輸出檔案 (cannot write output): {}", path)
            }
            EtlError::CsvError(e) => format!("CSV 寫入失敗 (CSV write failed): {}", e),
            EtlError::MissingConfigError { field } => {
                format!("缺少必要設定 (missing configuration): {}", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::UpstreamError { .. } => {
                "Check network access, the listing endpoint and that the API key (ticket) is valid"
            }
            EtlError::OutputError { .. } | EtlError::CsvError(_) => {
                "Check that the output directory exists or can be created and is writable"
            }
            EtlError::MissingConfigError { .. } => {
                "Set MERCADOPUBLICO_API_KEY in the environment or pass --api-key"
            }
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_and_output_errors_are_distinguishable() {
        let upstream = EtlError::upstream("http://api", "HTTP status 500");
        let output = EtlError::OutputError {
            path: "out/licitaciones.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(upstream.category(), ErrorCategory::Upstream);
        assert_eq!(output.category(), ErrorCategory::Output);
        assert_ne!(upstream.to_string(), output.to_string());
        assert!(output.to_string().contains("out/licitaciones.csv"));
    }

    #[test]
    fn test_missing_api_key_suggestion() {
        let err = EtlError::MissingConfigError {
            field: "MERCADOPUBLICO_API_KEY".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.recovery_suggestion().contains("MERCADOPUBLICO_API_KEY"));
        assert!(err.user_friendly_message().contains("MERCADOPUBLICO_API_KEY"));
    }
}
