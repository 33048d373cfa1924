use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Upstream request failed: {operation} returned HTTP {status} ({url})")]
    UpstreamError {
        operation: String,
        status: u16,
        url: String,
    },

    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected upstream payload from {operation}: {details}")]
    UnexpectedPayloadError { operation: String, details: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

/// 錯誤嚴重程度，用於決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 上游暫時性問題，下次排程會重試
    Medium,
    /// 設定或儲存層問題，需要人工處理
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ScraperError {
    pub fn upstream(operation: &str, status: reqwest::StatusCode, url: &str) -> Self {
        ScraperError::UpstreamError {
            operation: operation.to_string(),
            status: status.as_u16(),
            url: url.to_string(),
        }
    }

    /// 上游服務相關錯誤（HTTP 狀態、傳輸、回應格式）
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScraperError::UpstreamError { .. }
                | ScraperError::HttpError(_)
                | ScraperError::UnexpectedPayloadError { .. }
        )
    }

    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ScraperError::StorageError(_) | ScraperError::SerializationError(_)
        )
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScraperError::UpstreamError { .. }
            | ScraperError::HttpError(_)
            | ScraperError::UnexpectedPayloadError { .. } => ErrorSeverity::Medium,
            ScraperError::StorageError(_) | ScraperError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            ScraperError::ConfigError { .. }
            | ScraperError::MissingConfigError { .. }
            | ScraperError::InvalidConfigValueError { .. }
            | ScraperError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScraperError::UpstreamError { status, .. } if *status == 401 || *status == 403 => {
                "Check upstream.login and upstream.password".to_string()
            }
            ScraperError::UpstreamError { .. } | ScraperError::HttpError(_) => {
                "The catalog may be unavailable; the next scheduled run will try again".to_string()
            }
            ScraperError::UnexpectedPayloadError { .. } => {
                "Verify upstream.base_url points at the lunch catalog API".to_string()
            }
            ScraperError::StorageError(_) | ScraperError::SerializationError(_) => {
                "Check that storage.data_dir is writable and its JSON files are intact".to_string()
            }
            ScraperError::MissingConfigError { field } => {
                format!("Set '{}' in the config file or its environment variable", field)
            }
            ScraperError::ConfigError { .. }
            | ScraperError::InvalidConfigValueError { .. }
            | ScraperError::ConfigValidationError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScraperError::UpstreamError { operation, status, .. } => {
                format!("Lunch catalog rejected {} (HTTP {})", operation, status)
            }
            ScraperError::HttpError(_) => "Could not reach the lunch catalog".to_string(),
            ScraperError::UnexpectedPayloadError { operation, .. } => {
                format!("Lunch catalog returned an unexpected response for {}", operation)
            }
            ScraperError::StorageError(e) => format!("Could not read or write data files: {}", e),
            ScraperError::SerializationError(e) => format!("Corrupt data file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_are_medium_severity() {
        let err = ScraperError::upstream(
            "discovery",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "http://localhost/employees/api/v3/menu_categories",
        );
        assert!(err.is_upstream());
        assert!(!err.is_storage());
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_storage_errors_are_critical() {
        let err = ScraperError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert!(err.is_storage());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_exit_codes_by_severity() {
        let upstream = ScraperError::upstream("discovery", reqwest::StatusCode::BAD_GATEWAY, "http://x");
        let config = ScraperError::MissingConfigError {
            field: "upstream.login".to_string(),
        };
        assert_eq!(upstream.severity().exit_code(), 2);
        assert_eq!(config.severity().exit_code(), 3);
    }

    #[test]
    fn test_auth_failure_suggests_credentials() {
        let err = ScraperError::upstream("menu items", reqwest::StatusCode::UNAUTHORIZED, "http://x");
        assert!(err.recovery_suggestion().contains("upstream.login"));
    }
}
