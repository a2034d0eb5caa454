//! Module for telemetry functionality such as logging

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const FORMAT_VAR: &str = "LOG_FORMAT";

/// Sets up logging for the binary. The filter is taken from `RUST_LOG` (default is `info`),
/// the format (pretty/json) from `LOG_FORMAT`.
///
/// Logs always go to stderr: stdout carries the failed-order ledger.
pub fn setup_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = std::env::var(FORMAT_VAR).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?;
    }

    debug!("debug logging enabled, per-order document requests are traced");
    Ok(())
}
