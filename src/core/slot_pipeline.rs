use crate::core::accumulator::ListingAccumulator;
use crate::core::discovery::ProviderDiscovery;
use crate::core::menu_fetcher::MenuFetcher;
use crate::core::persister::MenuPersister;
use crate::domain::model::{CollectionDate, StageOutcome, TimeSlot};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fmt;
use std::time::{Duration, Instant};

/// 單一時段的處理階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStage {
    Discover,
    Accumulate,
    FetchMenus,
    Persist,
}

impl fmt::Display for SlotStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotStage::Discover => "discover",
            SlotStage::Accumulate => "accumulate",
            SlotStage::FetchMenus => "fetch-menus",
            SlotStage::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// 時段的終止狀態；兩者都算成功
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Completed,
    /// 該階段沒有產出，後續階段全部略過
    ShortCircuited { after: SlotStage },
}

#[derive(Debug, Clone)]
pub struct SlotReport {
    pub slot: TimeSlot,
    pub outcome: SlotOutcome,
    pub providers_discovered: usize,
    pub menus_persisted: usize,
    pub elapsed: Duration,
}

/// Discover -> Accumulate -> FetchMenus -> Persist，嚴格依序
pub struct SlotPipeline<S: Storage> {
    discovery: ProviderDiscovery,
    accumulator: ListingAccumulator<S>,
    menu_fetcher: MenuFetcher,
    persister: MenuPersister<S>,
}

impl<S: Storage> SlotPipeline<S> {
    pub fn new(
        discovery: ProviderDiscovery,
        accumulator: ListingAccumulator<S>,
        menu_fetcher: MenuFetcher,
        persister: MenuPersister<S>,
    ) -> Self {
        Self {
            discovery,
            accumulator,
            menu_fetcher,
            persister,
        }
    }

    pub async fn run(&self, date: &CollectionDate, slot: &TimeSlot) -> Result<SlotReport> {
        let start_time = Instant::now();
        tracing::info!("🕗 Slot {} started for {}", slot, date);

        let report = |outcome: SlotOutcome, providers_discovered: usize, menus_persisted: usize| SlotReport {
            slot: *slot,
            outcome,
            providers_discovered,
            menus_persisted,
            elapsed: start_time.elapsed(),
        };

        let discovered = self.discovery.fetch_available(date, slot).await?;
        let providers_discovered = discovered.len();

        let providers = match self.accumulator.accumulate(date, slot, discovered).await? {
            StageOutcome::Proceed(providers) => providers,
            StageOutcome::NothingToProcess => {
                return Ok(report(
                    SlotOutcome::ShortCircuited { after: SlotStage::Discover },
                    0,
                    0,
                ));
            }
        };

        let bundles = match self.menu_fetcher.fetch_menus(&providers, date, slot).await? {
            StageOutcome::Proceed(bundles) => bundles,
            StageOutcome::NothingToProcess => {
                return Ok(report(
                    SlotOutcome::ShortCircuited { after: SlotStage::FetchMenus },
                    providers_discovered,
                    0,
                ));
            }
        };

        let menus_persisted = self.persister.persist(&bundles, date, slot).await?;

        let report = report(SlotOutcome::Completed, providers_discovered, menus_persisted);
        tracing::info!(
            "✅ Slot {} completed (providers: {}, menus: {}, duration: {:?})",
            slot,
            report.providers_discovered,
            report.menus_persisted,
            report.elapsed
        );
        Ok(report)
    }
}
