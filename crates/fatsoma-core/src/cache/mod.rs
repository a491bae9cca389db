//! In-memory event cache.
//!
//! This module provides the `EventCache`, which serves the last successful
//! event listing for a bounded time (10 minutes by default), refreshes lazily
//! when a caller finds it expired, and falls back to the previous listing (or
//! an empty one) when the upstream API fails.
//!
//! Nothing is persisted; a process restart starts with an empty cache.

pub mod clock;
pub mod manager;

pub use clock::{Clock, SystemClock};
pub use manager::{CacheInfo, CachedData, EventCache, EventList, EventsOutcome};
