//! Cached, SSR-safe access to a Fatsoma promoter page's upcoming events.
//!
//! Build one [`EventCache`] at startup from a [`Config`] and an
//! [`ApiClient`], share it between request handlers, and call
//! [`EventCache::get_events`] while rendering. Results are kept in memory for
//! the configured TTL; when the upstream API fails the previous listing (or an
//! empty one) is served instead of an error.
//!
//! ```no_run
//! use fatsoma_core::{ApiClient, Config, EventCache};
//!
//! # async fn render() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new("my-page-id");
//! let client = ApiClient::new(&config.api_base_url)?;
//! let cache = EventCache::new(config, client)?;
//!
//! for event in cache.get_events().await.iter() {
//!     println!("{} - {}", event.starts_at, event.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod mapper;
pub mod models;

pub use api::{ApiClient, ApiError, EventSource};
pub use cache::{CacheInfo, Clock, EventCache, EventList, EventsOutcome, SystemClock};
pub use config::{Config, ConfigError};
pub use mapper::map_events;
pub use models::{Event, Location, Price};
