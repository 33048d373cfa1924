pub mod accumulator;
pub mod discovery;
pub mod menu_fetcher;
pub mod notifier;
pub mod persister;
pub mod sequencer;
pub mod slot_pipeline;

pub use crate::domain::model::{
    CollectionDate, MenuItemBundle, ProviderId, ProviderRecord, RunSummary, StageOutcome, TimeSlot,
};
pub use crate::domain::ports::{DeliveryAck, NotificationChannel, Storage, Throttle};
pub use crate::utils::error::Result;
