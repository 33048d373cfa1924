use crate::domain::model::{CollectionDate, TimeSlot};
use crate::utils::error::{Result, ScraperError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DELIVERY_PLACE_ID: u64 = 1203;
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 2;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MESSAGE: &str = "Lunch Tracker Scraper completed for {date}.";

/// 每次執行建立一次，以參考傳入各元件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub login: String,
    pub password: String,
    pub delivery_place_id: Option<u64>,
    pub cooldown_seconds: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "TimeSlot::default_slots")]
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub endpoint: String,
    pub topic: String,
    pub token: String,
    pub message: Option<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slots: TimeSlot::default_slots(),
        }
    }
}

// 密碼與 token 不輸出到日誌
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &"***")
            .field("delivery_place_id", &self.delivery_place_id)
            .field("cooldown_seconds", &self.cooldown_seconds)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("endpoint", &self.endpoint)
            .field("topic", &self.topic)
            .field("token", &"***")
            .field("message", &self.message)
            .finish()
    }
}

impl UpstreamConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn delivery_place_id(&self) -> u64 {
        self.delivery_place_id.unwrap_or(DEFAULT_DELIVERY_PLACE_ID)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds.unwrap_or(DEFAULT_COOLDOWN_SECONDS))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl StorageConfig {
    pub fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }
}

impl NotificationConfig {
    /// `{endpoint}/{topic}`
    pub fn topic_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.topic.trim_start_matches('/')
        )
    }

    /// 代入日期後的通知開頭訊息
    pub fn base_message(&self, date: &CollectionDate) -> String {
        self.message
            .as_deref()
            .unwrap_or(DEFAULT_MESSAGE)
            .replace("{date}", &date.to_string())
    }
}

impl ScraperConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ScraperError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScraperError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LUNCH_PASSWORD})，未設定的保留原樣交給驗證處理
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScraperError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.schedule.slots
    }
}

impl Validate for ScraperConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("upstream.base_url", &self.upstream.base_url)?;
        validation::validate_url("upstream.base_url", &self.upstream.base_url)?;
        validation::validate_non_empty_string("upstream.login", &self.upstream.login)?;
        validation::validate_non_empty_string("upstream.password", &self.upstream.password)?;
        validation::validate_range(
            "upstream.cooldown_seconds",
            self.upstream.cooldown().as_secs(),
            0,
            60,
        )?;
        validation::validate_range(
            "upstream.timeout_seconds",
            self.upstream.timeout().as_secs(),
            1,
            600,
        )?;

        validation::validate_ordered_unique("schedule.slots", &self.schedule.slots)?;

        validation::validate_path("storage.data_dir", self.storage.data_dir())?;

        validation::validate_non_empty_string("notification.endpoint", &self.notification.endpoint)?;
        validation::validate_url("notification.endpoint", &self.notification.endpoint)?;
        validation::validate_non_empty_string("notification.topic", &self.notification.topic)?;
        validation::validate_non_empty_string("notification.token", &self.notification.token)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[upstream]
base_url = "https://lunch.example.com/"
login = "alice"
password = "secret"

[schedule]
slots = ["08:00", "09:00", "11:30"]

[notification]
endpoint = "https://ntfy.example.com"
topic = "lunch"
token = "tk_123"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = ScraperConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.upstream.base_url(), "https://lunch.example.com");
        assert_eq!(config.upstream.delivery_place_id(), 1203);
        assert_eq!(config.upstream.cooldown(), Duration::from_secs(2));
        assert_eq!(config.storage.data_dir(), "data");
        assert_eq!(config.slots().len(), 3);
        assert_eq!(config.slots()[2].to_string(), "11:30");
        assert_eq!(config.notification.topic_url(), "https://ntfy.example.com/lunch");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_schedule_uses_default_slots() {
        let content = SAMPLE.replace("[schedule]\nslots = [\"08:00\", \"09:00\", \"11:30\"]\n", "");
        let config = ScraperConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.slots(), TimeSlot::default_slots().as_slice());
    }

    #[test]
    fn test_invalid_slot_is_a_parse_error() {
        let content = SAMPLE.replace("\"11:30\"", "\"noon\"");
        let err = ScraperConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ScraperError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_unordered_slots_fail_validation() {
        let content = SAMPLE.replace("[\"08:00\", \"09:00\", \"11:30\"]", "[\"09:00\", \"08:00\"]");
        let config = ScraperConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("LUNCH_SCRAPER_TEST_PASSWORD", "from-env");
        let content = SAMPLE.replace("\"secret\"", "\"${LUNCH_SCRAPER_TEST_PASSWORD}\"");
        let config = ScraperConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.upstream.password, "from-env");
    }

    #[test]
    fn test_unresolved_env_var_is_missing_config() {
        let content = SAMPLE.replace("\"tk_123\"", "\"${LUNCH_SCRAPER_TEST_UNSET_TOKEN}\"");
        let config = ScraperConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ScraperError::MissingConfigError { field }) if field == "notification.token"
        ));
    }

    #[test]
    fn test_base_message_substitutes_date() {
        let config = ScraperConfig::from_toml_str(SAMPLE).unwrap();
        let date = CollectionDate::parse("2024-06-10").unwrap();
        assert_eq!(
            config.notification.base_message(&date),
            "Lunch Tracker Scraper completed for 2024-06-10."
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = ScraperConfig::from_toml_str(SAMPLE).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("tk_123"));
    }
}
