//! API client for the Fatsoma public events endpoint.

use std::future::Future;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, Url};
use serde_json::Value;
use tracing::debug;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const EVENTS_PATH: &str = "/v1/events";

/// Only the first page is requested; 50 covers a promoter's upcoming listings.
const PAGE_SIZE: &str = "50";

/// Upcoming events first, ties broken by upstream relevance.
const SORT_ORDER: &str = "starts-at-time,relevance";

/// Anything able to return the raw upstream events document for a page.
///
/// The cache only depends on this trait, so tests can script responses and
/// failures without a network.
pub trait EventSource: Send + Sync {
    /// Fetch active events for `page_id` that end at or after `ends_after`.
    fn fetch_events(
        &self,
        page_id: &str,
        ends_after: DateTime<Utc>,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

/// HTTP client for api.fatsoma.com.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the events listing URL with its fixed filter, include, paging and sort params.
    pub fn events_url(&self, page_id: &str, ends_after: DateTime<Utc>) -> Result<Url, ApiError> {
        let ends_after = ends_after.to_rfc3339_opts(SecondsFormat::Millis, true);
        let url = format!("{}{}", self.base_url, EVENTS_PATH);

        Url::parse_with_params(
            &url,
            [
                ("filter[status]", "active"),
                ("filter[page.id]", page_id),
                ("filter[ends-at][gte]", ends_after.as_str()),
                ("include", "location"),
                ("page[number]", "1"),
                ("page[size]", PAGE_SIZE),
                ("sort", SORT_ORDER),
            ],
        )
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

impl EventSource for ApiClient {
    async fn fetch_events(
        &self,
        page_id: &str,
        ends_after: DateTime<Utc>,
    ) -> Result<Value, ApiError> {
        let url = self.events_url(page_id, ends_after)?;
        debug!(url = %url, "Fetching events");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse events response: {}", e)))
    }
}
