//! HTTP access to the Fatsoma events API.
//!
//! `EventSource` is the seam the cache fetches through; `ApiClient` is the
//! production implementation backed by `reqwest`. The endpoint is public, so
//! no authentication is involved.

pub mod client;
pub mod error;

pub use client::{ApiClient, EventSource};
pub use error::ApiError;
