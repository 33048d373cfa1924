pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{CatalogClient, FixedCooldown, LocalStorage, NoThrottle, NtfyChannel};
pub use config::ScraperConfig;
pub use core::sequencer::{DailyReport, DailySequencer};
pub use domain::model::{CollectionDate, TimeSlot};
pub use utils::error::{Result, ScraperError};
