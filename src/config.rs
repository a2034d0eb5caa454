//! Module for the tunables of a printing run

use std::{num::NonZeroUsize, time::Duration};

use tracing::warn;

const SHOP_CONCURRENCY_VAR: &str = "PRINT_SHOP_CONCURRENCY";
const CARRIER_CONCURRENCY_VAR: &str = "PRINT_CARRIER_CONCURRENCY";
const FETCH_TIMEOUT_VAR: &str = "PRINT_FETCH_TIMEOUT_MS";

const DEFAULT_SHOP_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(3).unwrap();
const DEFAULT_CARRIER_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(2).unwrap();
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Limits applied by the orchestrator.
///
/// Shops are processed in chunks of `shop_concurrency`, carrier groups of one shop in chunks of
/// `carrier_concurrency`. A chunk fully drains before the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub shop_concurrency: NonZeroUsize,
    pub carrier_concurrency: NonZeroUsize,
    /// Applied to every single document request
    pub fetch_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            shop_concurrency: DEFAULT_SHOP_CONCURRENCY,
            carrier_concurrency: DEFAULT_CARRIER_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    /// Reads the defaults, overridden by `PRINT_SHOP_CONCURRENCY`, `PRINT_CARRIER_CONCURRENCY`
    /// and `PRINT_FETCH_TIMEOUT_MS` where set. Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            shop_concurrency: parse_var(&lookup, SHOP_CONCURRENCY_VAR)
                .unwrap_or(defaults.shop_concurrency),
            carrier_concurrency: parse_var(&lookup, CARRIER_CONCURRENCY_VAR)
                .unwrap_or(defaults.carrier_concurrency),
            fetch_timeout: parse_var::<u64>(&lookup, FETCH_TIMEOUT_VAR)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}
