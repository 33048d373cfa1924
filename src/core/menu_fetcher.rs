use crate::adapters::CatalogClient;
use crate::domain::model::{
    CollectionDate, MenuItemBundle, ProviderId, ProviderRecord, StageOutcome, TimeSlot,
};
use crate::domain::ports::Throttle;
use crate::utils::error::Result;
use std::sync::Arc;
use url::Url;

pub const MENU_ITEMS_PATH: &str = "/employees/api/v4/menu_items";
const CATEGORY_FILTER_PARAM: &str = "q%5Bmenu_category_id_in_id_array%5D";

/// 菜單查詢的 `day` 參數：`YYYY-MM-DD+HH:MM`
pub fn combined_day(date: &CollectionDate, slot: &TimeSlot) -> String {
    format!("{}+{}", date, slot)
}

/// 逐一抓取供應商的菜單，每次請求後冷卻
pub struct MenuFetcher {
    client: CatalogClient,
    delivery_place_id: u64,
    throttle: Arc<dyn Throttle>,
}

impl MenuFetcher {
    pub fn new(client: CatalogClient, delivery_place_id: u64, throttle: Arc<dyn Throttle>) -> Self {
        Self {
            client,
            delivery_place_id,
            throttle,
        }
    }

    pub fn menu_url(
        &self,
        date: &CollectionDate,
        slot: &TimeSlot,
        provider_id: &ProviderId,
    ) -> Result<Url> {
        self.client.endpoint(&format!(
            "{}?delivery_place_id={}&day={}&{}={}",
            MENU_ITEMS_PATH,
            self.delivery_place_id,
            combined_day(date, slot),
            CATEGORY_FILTER_PARAM,
            provider_id
        ))
    }

    /// 沒有有效 `id` 的供應商直接略過；任何失敗都會中止本時段剩餘的供應商
    pub async fn fetch_menus(
        &self,
        providers: &[ProviderRecord],
        date: &CollectionDate,
        slot: &TimeSlot,
    ) -> Result<StageOutcome<Vec<MenuItemBundle>>> {
        if providers.is_empty() {
            tracing::info!("⏭️ No providers received for {} {}, skipping menu fetch", date, slot);
            return Ok(StageOutcome::NothingToProcess);
        }

        let mut bundles = Vec::with_capacity(providers.len());
        for provider in providers {
            let Some(provider_id) = provider.id() else {
                tracing::debug!("Skipping provider without id: {:?}", provider.name());
                continue;
            };

            tracing::info!(
                "🍽️ Fetching menu for {} ({}) at {}",
                provider.name().unwrap_or("unnamed provider"),
                provider_id,
                slot
            );
            let url = self.menu_url(date, slot, &provider_id)?;
            let menu = self.client.get_json("menu items", url).await?;

            bundles.push(MenuItemBundle {
                provider_id,
                provider_name: provider.name().map(str::to_string),
                menu,
            });
            self.throttle.cooldown().await;
        }

        Ok(StageOutcome::from_batch(bundles))
    }
}
