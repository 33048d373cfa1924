use crate::adapters::CatalogClient;
use crate::domain::model::{CollectionDate, ProviderRecord, TimeSlot};
use crate::domain::ports::Throttle;
use crate::utils::error::{Result, ScraperError};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

pub const DISCOVERY_PATH: &str = "/employees/api/v3/menu_categories";

/// 查詢某日某時段有提供午餐的供應商
pub struct ProviderDiscovery {
    client: CatalogClient,
    delivery_place_id: u64,
    throttle: Arc<dyn Throttle>,
}

impl ProviderDiscovery {
    pub fn new(client: CatalogClient, delivery_place_id: u64, throttle: Arc<dyn Throttle>) -> Self {
        Self {
            client,
            delivery_place_id,
            throttle,
        }
    }

    pub fn discovery_url(&self, date: &CollectionDate, slot: &TimeSlot) -> Result<Url> {
        self.client.endpoint(&format!(
            "{}?day={}&hour={}&delivery_place_id={}",
            DISCOVERY_PATH, date, slot, self.delivery_place_id
        ))
    }

    /// 每次呼叫只發一個請求；成功後必須等待冷卻時間才回傳
    pub async fn fetch_available(
        &self,
        date: &CollectionDate,
        slot: &TimeSlot,
    ) -> Result<Vec<ProviderRecord>> {
        let url = self.discovery_url(date, slot)?;
        let payload = self.client.get_json("provider discovery", url).await?;
        self.throttle.cooldown().await;

        let providers = parse_providers(payload)?;
        tracing::info!(
            "📥 Discovered {} providers for {} {}",
            providers.len(),
            date,
            slot
        );
        Ok(providers)
    }
}

fn parse_providers(payload: Value) -> Result<Vec<ProviderRecord>> {
    match payload {
        Value::Array(items) => items.into_iter().map(ProviderRecord::try_from).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(ScraperError::UnexpectedPayloadError {
            operation: "provider discovery".to_string(),
            details: format!("expected an array of providers, got {}", other),
        }),
    }
}
