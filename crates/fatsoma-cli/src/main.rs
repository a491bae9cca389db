//! fatsoma - print a Fatsoma page's upcoming events as JSON.
//!
//! Configuration comes from the environment (or a `.env` file):
//! `FATSOMA_PAGE_ID` is required; `FATSOMA_API_BASE_URL`,
//! `FATSOMA_CACHE_TTL_MS` and `FATSOMA_FETCH_TIMEOUT_MS` are optional.

use std::io;

use anyhow::{Context, Result};
use fatsoma_core::{ApiClient, Config, EventCache, EventsOutcome};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage: fatsoma [--info]

Fetch upcoming events for FATSOMA_PAGE_ID and print them as JSON.

Options:
  --info    Print cache state after fetching instead of the events
  --help    Show this message";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    if let Some(unknown) = args.iter().find(|a| a.as_str() != "--info") {
        anyhow::bail!("Unknown argument: {}\n\n{}", unknown, USAGE);
    }
    let show_info = !args.is_empty();

    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let client = ApiClient::new(&config.api_base_url).context("Failed to build HTTP client")?;
    let cache = EventCache::new(config, client)?;
    info!(page_id = %cache.config().page_id, "Fetching Fatsoma events");

    let outcome = cache.load().await;
    match &outcome {
        EventsOutcome::Stale(_) => eprintln!("Warning: upstream unavailable, showing stale events"),
        EventsOutcome::Empty => eprintln!("Warning: upstream unavailable, no events to show"),
        EventsOutcome::Cached(_) | EventsOutcome::Fresh(_) => {}
    }

    let json = if show_info {
        serde_json::to_string_pretty(&cache.cache_info())?
    } else {
        serde_json::to_string_pretty(outcome.events())?
    };
    println!("{}", json);

    Ok(())
}
