use crate::domain::model::{CollectionDate, RunSummary};
use crate::domain::ports::{NotificationChannel, Storage};
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NotificationReport {
    pub summary: RunSummary,
    pub message: String,
    pub delivered: bool,
    pub status: Option<u16>,
}

/// 執行結束後發送摘要；檔案數量一律從儲存層重新計算
pub struct CompletionNotifier<S: Storage> {
    storage: S,
    channel: Arc<dyn NotificationChannel>,
}

impl<S: Storage> CompletionNotifier<S> {
    pub fn new(storage: S, channel: Arc<dyn NotificationChannel>) -> Self {
        Self { storage, channel }
    }

    /// 發送失敗只記錄，不重試也不回傳錯誤
    pub async fn notify(&self, date: &CollectionDate, base_message: &str) -> Result<NotificationReport> {
        let summary = RunSummary {
            date: *date,
            menu_files: self.storage.count_menu_files(date).await?,
        };
        let message = summary.message(base_message);

        let (delivered, status) = match self.channel.deliver(&message).await {
            Ok(ack) if ack.is_success() => {
                tracing::info!("📣 Message sent successfully: {}", message);
                (true, Some(ack.status))
            }
            Ok(ack) => {
                tracing::warn!("⚠️ Notification rejected with HTTP {}", ack.status);
                (false, Some(ack.status))
            }
            Err(e) => {
                tracing::warn!("⚠️ Notification delivery failed: {}", e);
                (false, None)
            }
        };

        Ok(NotificationReport {
            summary,
            message,
            delivered,
            status,
        })
    }
}
