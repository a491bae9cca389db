//! Public data models for Fatsoma events.
//!
//! - `Event`: normalized event record handed to rendering code
//! - `Price`: optional min/max ticket price
//! - `Location`: venue name, city and a precomputed display string

pub mod event;

pub use event::{Event, Location, Price, EVENT_URL_PREFIX};
