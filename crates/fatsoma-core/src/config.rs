//! Runtime configuration for the event cache.
//!
//! The only required value is the Fatsoma page identifier. Everything else has
//! a default matching the upstream API's expectations and can be overridden
//! through environment variables.

use std::time::Duration;

use thiserror::Error;

/// Public Fatsoma API host
pub const DEFAULT_API_BASE_URL: &str = "https://api.fatsoma.com";

/// Cached results are served for 10 minutes before a refresh is attempted.
pub const DEFAULT_TTL_MS: u64 = 10 * 60 * 1000;

/// Upstream calls are abandoned after 5 seconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

const ENV_PAGE_ID: &str = "FATSOMA_PAGE_ID";
const ENV_API_BASE_URL: &str = "FATSOMA_API_BASE_URL";
const ENV_CACHE_TTL_MS: &str = "FATSOMA_CACHE_TTL_MS";
const ENV_FETCH_TIMEOUT_MS: &str = "FATSOMA_FETCH_TIMEOUT_MS";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required page id (set FATSOMA_PAGE_ID)")]
    MissingPageId,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub page_id: String,
    pub api_base_url: String,
    pub ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ttl: Duration::from_millis(DEFAULT_TTL_MS),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        }
    }

    /// Build a config from `FATSOMA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let page_id = lookup(ENV_PAGE_ID).unwrap_or_default();
        let mut config = Self::new(page_id.trim());

        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = parse_millis(&lookup, ENV_CACHE_TTL_MS)? {
            config.ttl = ms;
        }
        if let Some(ms) = parse_millis(&lookup, ENV_FETCH_TIMEOUT_MS)? {
            config.fetch_timeout = ms;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_id.trim().is_empty() {
            return Err(ConfigError::MissingPageId);
        }
        Ok(())
    }

    pub fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}
