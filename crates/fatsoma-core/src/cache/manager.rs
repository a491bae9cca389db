use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{ApiError, EventSource};
use crate::config::{Config, ConfigError};
use crate::mapper::map_events;
use crate::models::Event;

use super::{Clock, SystemClock};

/// Shared, immutable event listing handed out to callers.
pub type EventList = Arc<Vec<Event>>;

/// A result paired with the instant it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    /// Age relative to `now`; clock skew into the past reads as zero.
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.cached_at).num_milliseconds().max(0)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_ms: i64) -> bool {
        self.age_ms(now) < ttl_ms
    }
}

/// How a `load` call was satisfied.
#[derive(Debug, Clone)]
pub enum EventsOutcome {
    /// Served from a cache entry still inside its TTL; no request was made.
    Cached(EventList),
    /// Fetched from upstream just now and stored.
    Fresh(EventList),
    /// Upstream failed; the expired previous listing was served instead.
    Stale(EventList),
    /// Upstream failed and nothing had been cached yet.
    Empty,
}

impl EventsOutcome {
    pub fn events(&self) -> &[Event] {
        match self {
            EventsOutcome::Cached(events)
            | EventsOutcome::Fresh(events)
            | EventsOutcome::Stale(events) => events,
            EventsOutcome::Empty => &[],
        }
    }

    pub fn into_events(self) -> EventList {
        match self {
            EventsOutcome::Cached(events)
            | EventsOutcome::Fresh(events)
            | EventsOutcome::Stale(events) => events,
            EventsOutcome::Empty => Arc::new(Vec::new()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, EventsOutcome::Stale(_) | EventsOutcome::Empty)
    }
}

/// Snapshot of cache state, serialized as `{hasCache, ageMs, ttlMs, expiresInMs}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub has_cache: bool,
    pub age_ms: Option<i64>,
    pub ttl_ms: i64,
    pub expires_in_ms: Option<i64>,
}

/// Stale-while-revalidate cache over an `EventSource`.
///
/// Construct one per process and share it (e.g. behind an `Arc`). Expiry is
/// evaluated lazily on read; there are no background timers. Refreshes are
/// single-flight: concurrent callers that miss the cache wait for one upstream
/// request instead of each issuing their own, and share its failure too.
pub struct EventCache<S, C = SystemClock> {
    config: Config,
    source: S,
    clock: C,
    slot: RwLock<Option<CachedData<EventList>>>,
    refresh: Mutex<()>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
}

impl<S: EventSource> EventCache<S> {
    pub fn new(config: Config, source: S) -> Result<Self, ConfigError> {
        Self::with_clock(config, source, SystemClock)
    }
}

impl<S: EventSource, C: Clock> EventCache<S, C> {
    pub fn with_clock(config: Config, source: S, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            clock,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
            attempts: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return events, refreshing from upstream when the cache has expired.
    ///
    /// Never fails: upstream errors resolve to `Stale` or `Empty`.
    pub async fn load(&self) -> EventsOutcome {
        if let Some(events) = self.fresh_events() {
            debug!(count = events.len(), "Serving cached events");
            return EventsOutcome::Cached(events);
        }

        let attempts_seen = self.attempts.load(Ordering::Acquire);
        let _refreshing = self.refresh.lock().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(events) = self.fresh_events() {
            debug!(count = events.len(), "Serving events refreshed by a concurrent caller");
            return EventsOutcome::Cached(events);
        }

        // ...or tried and failed; one failed attempt is enough for this round
        if self.attempts.load(Ordering::Acquire) != attempts_seen {
            debug!("Concurrent event refresh failed, skipping another attempt");
            return self.previous_outcome();
        }

        let result = self.fetch().await;
        self.attempts.fetch_add(1, Ordering::Release);

        match result {
            Ok(events) => {
                let events = Arc::new(events);
                self.store(Arc::clone(&events));
                info!(count = events.len(), "Refreshed events from Fatsoma");
                EventsOutcome::Fresh(events)
            }
            Err(e) => {
                let outcome = self.previous_outcome();
                match &outcome {
                    EventsOutcome::Stale(_) => warn!(
                        error = %e,
                        age_ms = self.cache_info().age_ms,
                        "Event refresh failed, serving stale events"
                    ),
                    _ => warn!(error = %e, "Event refresh failed with nothing cached, serving no events"),
                }
                outcome
            }
        }
    }

    /// Fallback after a failed refresh: the previous listing, or nothing.
    fn previous_outcome(&self) -> EventsOutcome {
        let slot = self.read_slot();
        match slot.as_ref() {
            Some(cached) => EventsOutcome::Stale(Arc::clone(&cached.data)),
            None => EventsOutcome::Empty,
        }
    }

    /// The event list from `load`, without the outcome tag.
    pub async fn get_events(&self) -> EventList {
        self.load().await.into_events()
    }

    /// Drop the cached listing so the next read goes upstream.
    pub fn clear_cache(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        debug!("Event cache cleared");
    }

    pub fn cache_info(&self) -> CacheInfo {
        let ttl_ms = self.config.ttl_ms();
        let age_ms = self
            .read_slot()
            .as_ref()
            .map(|cached| cached.age_ms(self.clock.now()));

        CacheInfo {
            has_cache: age_ms.is_some(),
            age_ms,
            ttl_ms,
            expires_in_ms: age_ms.map(|age| (ttl_ms - age).max(0)),
        }
    }

    /// Single upstream attempt bounded by the fetch timeout. On timeout the
    /// request future is dropped, which aborts the underlying HTTP call.
    async fn fetch(&self) -> Result<Vec<Event>, ApiError> {
        let timeout = self.config.fetch_timeout;
        let request = self
            .source
            .fetch_events(&self.config.page_id, self.clock.now());

        let payload = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| ApiError::Timeout(timeout))??;

        Ok(map_events(&payload))
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Option<CachedData<EventList>>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh_events(&self) -> Option<EventList> {
        let now = self.clock.now();
        let ttl_ms = self.config.ttl_ms();
        self.read_slot()
            .as_ref()
            .filter(|cached| cached.is_fresh(now, ttl_ms))
            .map(|cached| Arc::clone(&cached.data))
    }

    fn store(&self, events: EventList) {
        let cached = CachedData::new(events, self.clock.now());
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(cached);
    }
}

// ============================================================================
// Tests
// ============================================================================
