use crate::domain::model::{CollectionDate, MenuItemBundle, TimeSlot};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

pub struct MenuPersister<S: Storage> {
    storage: S,
}

impl<S: Storage> MenuPersister<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 每個供應商一個檔案；回傳寫入數量僅供日誌使用
    pub async fn persist(
        &self,
        bundles: &[MenuItemBundle],
        date: &CollectionDate,
        slot: &TimeSlot,
    ) -> Result<usize> {
        for bundle in bundles {
            let path = self.storage.write_menu_bundle(date, slot, bundle).await?;
            tracing::debug!("💾 Saved menu data to {}", path.display());
        }

        if !bundles.is_empty() {
            tracing::info!("💾 Persisted {} menu files for {} {}", bundles.len(), date, slot);
        }
        Ok(bundles.len())
    }
}
