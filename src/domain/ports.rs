use crate::domain::model::{CollectionDate, MenuItemBundle, ProviderRecord, TimeSlot};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// 依日期分區的資料儲存層，擁有所有落地狀態
pub trait Storage: Send + Sync {
    /// 建立當日兩個資料集目錄，可重複呼叫；回傳日期資料夾名稱
    fn ensure_daily_directories(
        &self,
        date: &CollectionDate,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn read_listing(
        &self,
        date: &CollectionDate,
    ) -> impl std::future::Future<Output = Result<Vec<ProviderRecord>>> + Send;

    /// 讀取既有清單後接上新批次再整份寫回（非交易式）
    fn append_listing(
        &self,
        date: &CollectionDate,
        batch: &[ProviderRecord],
    ) -> impl std::future::Future<Output = Result<Vec<ProviderRecord>>> + Send;

    fn write_menu_bundle(
        &self,
        date: &CollectionDate,
        slot: &TimeSlot,
        bundle: &MenuItemBundle,
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;

    fn count_menu_files(
        &self,
        date: &CollectionDate,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}

/// 上游限流用的冷卻等待
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn cooldown(&self);
}

/// 通知頻道的回應
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryAck {
    pub status: u16,
}

impl DeliveryAck {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, message: &str) -> Result<DeliveryAck>;
}
