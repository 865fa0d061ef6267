//! Core configuration and process setup for Rain Dots.

pub mod config;

pub use config::{Config, DaytimeWindow, Region, RegionCode, RetrySettings, RunMode};

use anyhow::Result;

/// Initialize the tracing subscriber.
///
/// Log level defaults to `info`, overridable via `RUST_LOG`.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("Rain Dots core initialized");
    Ok(())
}
