// Adapters layer: concrete implementations for external systems (filesystem,
// lunch catalog HTTP API, ntfy notifications, rate limiting).

pub mod http;
pub mod notify;
pub mod storage;
pub mod throttle;

pub use http::CatalogClient;
pub use notify::NtfyChannel;
pub use storage::LocalStorage;
pub use throttle::{FixedCooldown, NoThrottle};
