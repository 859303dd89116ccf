use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::fetch::{DEFAULT_ENDPOINT, RetryPolicy};
use crate::transform::THUMB_WIDTH;

pub const DEFAULT_LIMIT: u32 = 120;
pub const DEFAULT_OUT_FILE: &str = "data.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub limit: u32,
    pub out: PathBuf,
    pub endpoint: String,
    pub width: u32,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            out: PathBuf::from(DEFAULT_OUT_FILE),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            width: THUMB_WIDTH,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Lenient limit parsing: anything that is not a positive integer falls back
/// to [`DEFAULT_LIMIT`].
pub fn resolve_limit(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_LIMIT;
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        Ok(n) => {
            warn!("LIMIT={n} is not positive; using {DEFAULT_LIMIT}");
            DEFAULT_LIMIT
        }
        Err(_) => {
            warn!("LIMIT={raw:?} is not a number; using {DEFAULT_LIMIT}");
            DEFAULT_LIMIT
        }
    }
}
