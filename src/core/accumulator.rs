use crate::domain::model::{CollectionDate, ProviderRecord, StageOutcome, TimeSlot};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// 把每個時段新發現的供應商接到當日清單
pub struct ListingAccumulator<S: Storage> {
    storage: S,
}

impl<S: Storage> ListingAccumulator<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 回傳本時段自己的批次（不是合併後的整份清單）；空批次不碰儲存層
    pub async fn accumulate(
        &self,
        date: &CollectionDate,
        slot: &TimeSlot,
        discovered: Vec<ProviderRecord>,
    ) -> Result<StageOutcome<Vec<ProviderRecord>>> {
        if discovered.is_empty() {
            tracing::info!("⏭️ No providers at {} {}, listing untouched", date, slot);
            return Ok(StageOutcome::NothingToProcess);
        }

        let listing = self.storage.append_listing(date, &discovered).await?;
        tracing::info!(
            "🗂️ Listing for {} updated at {}: +{} providers ({} total)",
            date,
            slot,
            discovered.len(),
            listing.len()
        );

        Ok(StageOutcome::Proceed(discovered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use serde_json::json;
    use tempfile::TempDir;

    fn provider(id: i64, name: &str) -> ProviderRecord {
        ProviderRecord::try_from(json!({"id": id, "name": name})).unwrap()
    }

    #[tokio::test]
    async fn test_accumulate_returns_slot_batch_only() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let accumulator = ListingAccumulator::new(storage.clone());
        let date = CollectionDate::parse("2024-06-10").unwrap();

        accumulator
            .accumulate(&date, &TimeSlot::parse("08:00").unwrap(), vec![provider(1, "A")])
            .await
            .unwrap();
        let outcome = accumulator
            .accumulate(&date, &TimeSlot::parse("09:00").unwrap(), vec![provider(2, "B")])
            .await
            .unwrap();

        assert_eq!(outcome, StageOutcome::Proceed(vec![provider(2, "B")]));
        assert_eq!(
            storage.read_listing(&date).await.unwrap(),
            vec![provider(1, "A"), provider(2, "B")]
        );
    }

    #[tokio::test]
    async fn test_accumulate_empty_batch_does_not_create_listing() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let accumulator = ListingAccumulator::new(storage.clone());
        let date = CollectionDate::parse("2024-06-10").unwrap();

        let outcome = accumulator
            .accumulate(&date, &TimeSlot::parse("08:00").unwrap(), Vec::new())
            .await
            .unwrap();

        assert!(outcome.is_nothing_to_process());
        assert!(!storage.listing_path(&date).exists());
    }
}
