use crate::adapters::{CatalogClient, NtfyChannel};
use crate::config::ScraperConfig;
use crate::core::accumulator::ListingAccumulator;
use crate::core::discovery::ProviderDiscovery;
use crate::core::menu_fetcher::MenuFetcher;
use crate::core::notifier::{CompletionNotifier, NotificationReport};
use crate::core::persister::MenuPersister;
use crate::core::slot_pipeline::{SlotOutcome, SlotPipeline, SlotReport};
use crate::domain::model::{CollectionDate, TimeSlot};
use crate::domain::ports::{NotificationChannel, Storage, Throttle};
use crate::utils::error::{Result, ScraperError};
use std::sync::Arc;

#[derive(Debug)]
pub struct SlotFailure {
    pub slot: TimeSlot,
    pub error: ScraperError,
}

/// 一整天的執行結果
#[derive(Debug)]
pub struct DailyReport {
    pub date: CollectionDate,
    pub folder_token: String,
    pub slots: Vec<SlotReport>,
    pub failure: Option<SlotFailure>,
    /// 因前面時段失敗而沒有執行的時段
    pub not_run: Vec<TimeSlot>,
    /// 通知步驟本身失敗時為 `None`，錯誤放在 `notification_error`
    pub notification: Option<NotificationReport>,
    pub notification_error: Option<ScraperError>,
}

impl DailyReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn completed_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|r| r.outcome == SlotOutcome::Completed)
            .count()
    }

    /// 時段失敗優先於通知失敗回傳
    pub fn into_result(mut self) -> Result<DailyReport> {
        if let Some(failure) = self.failure.take() {
            return Err(failure.error);
        }
        match self.notification_error.take() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

/// 依序執行當日所有時段：建立目錄 -> 各時段 -> 通知
pub struct DailySequencer<S: Storage> {
    storage: S,
    slots: Vec<TimeSlot>,
    pipeline: SlotPipeline<S>,
    notifier: CompletionNotifier<S>,
    message_template: Box<dyn Fn(&CollectionDate) -> String + Send + Sync>,
}

impl<S: Storage + Clone> DailySequencer<S> {
    pub fn new(
        storage: S,
        slots: Vec<TimeSlot>,
        pipeline: SlotPipeline<S>,
        notifier: CompletionNotifier<S>,
        message_template: impl Fn(&CollectionDate) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            storage,
            slots,
            pipeline,
            notifier,
            message_template: Box::new(message_template),
        }
    }

    /// 依設定組裝所有元件
    pub fn from_config(
        config: &ScraperConfig,
        storage: S,
        throttle: Arc<dyn Throttle>,
    ) -> Result<Self> {
        let channel: Arc<dyn NotificationChannel> = Arc::new(NtfyChannel::new(&config.notification));
        Self::from_config_with_channel(config, storage, throttle, channel)
    }

    pub fn from_config_with_channel(
        config: &ScraperConfig,
        storage: S,
        throttle: Arc<dyn Throttle>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Result<Self> {
        let client = CatalogClient::new(&config.upstream)?;
        let delivery_place_id = config.upstream.delivery_place_id();

        let pipeline = SlotPipeline::new(
            ProviderDiscovery::new(client.clone(), delivery_place_id, throttle.clone()),
            ListingAccumulator::new(storage.clone()),
            MenuFetcher::new(client, delivery_place_id, throttle),
            MenuPersister::new(storage.clone()),
        );
        let notifier = CompletionNotifier::new(storage.clone(), channel);
        let notification = config.notification.clone();

        Ok(Self::new(
            storage,
            config.slots().to_vec(),
            pipeline,
            notifier,
            move |date| notification.base_message(date),
        ))
    }

    /// 時段嚴格依序；任一時段失敗即停止當日剩餘時段，但通知一定會送出
    pub async fn run(&self, date: &CollectionDate) -> Result<DailyReport> {
        tracing::info!("🚀 Collecting lunch menus for {} ({} slots)", date, self.slots.len());

        let folder_token = self.storage.ensure_daily_directories(date).await?;
        tracing::info!("📁 Daily folders ready: {}", folder_token);

        let mut reports = Vec::with_capacity(self.slots.len());
        let mut failure = None;
        let mut not_run = Vec::new();

        for slot in &self.slots {
            if failure.is_some() {
                not_run.push(*slot);
                continue;
            }

            match self.pipeline.run(date, slot).await {
                Ok(report) => reports.push(report),
                Err(error) => {
                    tracing::error!("❌ Slot {} failed: {}", slot, error);
                    failure = Some(SlotFailure { slot: *slot, error });
                }
            }
        }

        if !not_run.is_empty() {
            tracing::warn!("⏭️ {} later slots not run after failure", not_run.len());
        }

        let base_message = (self.message_template)(date);
        let (notification, notification_error) =
            match self.notifier.notify(date, &base_message).await {
                Ok(report) => (Some(report), None),
                Err(error) => {
                    tracing::error!("❌ Completion notification failed: {}", error);
                    (None, Some(error))
                }
            };

        Ok(DailyReport {
            date: *date,
            folder_token,
            slots: reports,
            failure,
            not_run,
            notification,
            notification_error,
        })
    }
}
