use crate::domain::model::{CollectionDate, MenuItemBundle, ProviderId, ProviderRecord, TimeSlot};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const LISTING_DATASET: &str = "restaurants";
const MENU_DATASET: &str = "lunch_menu";

/// 本地檔案系統儲存：
/// `restaurants/{YYYY_MM_DD}/available_restaurants_{date}.json`
/// `lunch_menu/{YYYY_MM_DD}/lunch_menu_{date}_{HH:MM}_{id}.json`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn listing_dir(&self, date: &CollectionDate) -> PathBuf {
        self.base_path.join(LISTING_DATASET).join(date.folder_token())
    }

    pub fn menu_dir(&self, date: &CollectionDate) -> PathBuf {
        self.base_path.join(MENU_DATASET).join(date.folder_token())
    }

    pub fn listing_path(&self, date: &CollectionDate) -> PathBuf {
        self.listing_dir(date)
            .join(format!("available_restaurants_{}.json", date))
    }

    pub fn menu_path(&self, date: &CollectionDate, slot: &TimeSlot, provider_id: &ProviderId) -> PathBuf {
        self.menu_dir(date)
            .join(format!("lunch_menu_{}_{}_{}.json", date, slot, provider_id))
    }
}

/// 縮排兩格、保留非 ASCII 字元
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

impl Storage for LocalStorage {
    async fn ensure_daily_directories(&self, date: &CollectionDate) -> Result<String> {
        for dir in [self.listing_dir(date), self.menu_dir(date)] {
            tokio::fs::create_dir_all(&dir).await?;
            tracing::debug!("📁 Ensured directory: {}", dir.display());
        }
        Ok(date.folder_token())
    }

    async fn read_listing(&self, date: &CollectionDate) -> Result<Vec<ProviderRecord>> {
        match tokio::fs::read(self.listing_path(date)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn append_listing(
        &self,
        date: &CollectionDate,
        batch: &[ProviderRecord],
    ) -> Result<Vec<ProviderRecord>> {
        let mut listing = self.read_listing(date).await?;
        listing.extend_from_slice(batch);

        tokio::fs::create_dir_all(self.listing_dir(date)).await?;
        let path = self.listing_path(date);
        write_json(&path, &listing).await?;
        tracing::debug!("💾 Listing written to {} ({} providers)", path.display(), listing.len());

        Ok(listing)
    }

    async fn write_menu_bundle(
        &self,
        date: &CollectionDate,
        slot: &TimeSlot,
        bundle: &MenuItemBundle,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(self.menu_dir(date)).await?;
        let path = self.menu_path(date, slot, &bundle.provider_id);
        write_json(&path, &bundle.menu).await?;
        Ok(path)
    }

    async fn count_menu_files(&self, date: &CollectionDate) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(self.menu_dir(date)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
            if is_json && entry.file_type().await?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn provider(value: serde_json::Value) -> ProviderRecord {
        ProviderRecord::try_from(value).unwrap()
    }

    fn bundle(id: i64, menu: serde_json::Value) -> MenuItemBundle {
        MenuItemBundle {
            provider_id: ProviderId::from_value(&json!(id)).unwrap(),
            provider_name: None,
            menu,
        }
    }

    fn date() -> CollectionDate {
        CollectionDate::parse("2024-06-10").unwrap()
    }

    #[tokio::test]
    async fn test_ensure_daily_directories_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let first = storage.ensure_daily_directories(&date()).await.unwrap();
        let second = storage.ensure_daily_directories(&date()).await.unwrap();

        assert_eq!(first, "2024_06_10");
        assert_eq!(first, second);
        assert!(temp_dir.path().join("restaurants/2024_06_10").is_dir());
        assert!(temp_dir.path().join("lunch_menu/2024_06_10").is_dir());

        let dataset_dirs = std::fs::read_dir(temp_dir.path().join("lunch_menu")).unwrap().count();
        assert_eq!(dataset_dirs, 1);
    }

    #[tokio::test]
    async fn test_append_listing_concatenates_batches_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let b1 = vec![provider(json!({"id": 1, "name": "A"}))];
        let b2 = vec![
            provider(json!({"id": 2, "name": "B"})),
            provider(json!({"id": 1, "name": "A"})),
        ];
        let b3 = vec![provider(json!({"id": 3, "name": "C"}))];

        storage.append_listing(&date(), &b1).await.unwrap();
        storage.append_listing(&date(), &b2).await.unwrap();
        let persisted = storage.append_listing(&date(), &b3).await.unwrap();

        let expected: Vec<ProviderRecord> = b1.into_iter().chain(b2).chain(b3).collect();
        assert_eq!(persisted, expected);
        assert_eq!(storage.read_listing(&date()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_listing_file_is_pretty_and_keeps_non_ascii() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage
            .append_listing(&date(), &[provider(json!({"id": 5, "name": "Żurek & Pierogi"}))])
            .await
            .unwrap();

        let path = temp_dir
            .path()
            .join("restaurants/2024_06_10/available_restaurants_2024-06-10.json");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Żurek & Pierogi"));
        assert!(content.contains("\n  {\n    \"id\": 5,"));
    }

    #[tokio::test]
    async fn test_read_listing_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        assert!(storage.read_listing(&date()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_menu_files_are_keyed_by_slot_and_provider() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let morning = TimeSlot::parse("08:00").unwrap();
        let noon = TimeSlot::parse("12:30").unwrap();

        let path = storage
            .write_menu_bundle(&date(), &morning, &bundle(1, json!({"items": ["soup"]})))
            .await
            .unwrap();
        assert!(path.ends_with("lunch_menu/2024_06_10/lunch_menu_2024-06-10_08:00_1.json"));

        storage
            .write_menu_bundle(&date(), &noon, &bundle(1, json!({"items": ["salad"]})))
            .await
            .unwrap();

        let morning_menu: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(morning_menu, json!({"items": ["soup"]}));
        assert_eq!(storage.count_menu_files(&date()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_write_menu_bundle_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let slot = TimeSlot::parse("09:00").unwrap();

        storage.write_menu_bundle(&date(), &slot, &bundle(4, json!([1]))).await.unwrap();
        let path = storage.write_menu_bundle(&date(), &slot, &bundle(4, json!([2]))).await.unwrap();

        let menu: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(menu, json!([2]));
        assert_eq!(storage.count_menu_files(&date()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_menu_files_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert_eq!(storage.count_menu_files(&date()).await.unwrap(), 0);

        storage.ensure_daily_directories(&date()).await.unwrap();
        std::fs::write(storage.menu_dir(&date()).join("notes.txt"), "x").unwrap();
        assert_eq!(storage.count_menu_files(&date()).await.unwrap(), 0);
    }
}
