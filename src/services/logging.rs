//! Tracing subscriber setup.
//!
//! Console output is structured JSON. The filter comes from `RUST_LOG`, with
//! a default that keeps this crate and HTTP traces at debug level.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "catalog=debug,tower_http=debug,async_graphql=info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;
    Ok(())
}
