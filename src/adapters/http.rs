use crate::config::UpstreamConfig;
use crate::utils::error::{Result, ScraperError};
use reqwest::Client;
use url::Url;

/// 午餐目錄 API 的 HTTP 客戶端（Basic Auth）
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    login: String,
    password: String,
}

impl CatalogClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            login: config.login.clone(),
            password: config.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 以 `base_url + path_and_query` 組出完整網址；查詢字串照原樣送出
    pub fn endpoint(&self, path_and_query: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path_and_query);
        Url::parse(&raw).map_err(|e| ScraperError::InvalidConfigValueError {
            field: "upstream.base_url".to_string(),
            value: raw,
            reason: format!("Cannot build request URL: {}", e),
        })
    }

    /// 非 2xx 狀態直接回傳 `UpstreamError`，不重試
    pub async fn get_json(&self, operation: &str, url: Url) -> Result<serde_json::Value> {
        tracing::debug!("🌐 {} request: {}", operation, url);

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.login, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} response status: {}", operation, status);

        if !status.is_success() {
            return Err(ScraperError::upstream(operation, status, url.as_str()));
        }

        Ok(response.json().await?)
    }
}
