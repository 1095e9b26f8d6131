use std::path::PathBuf;
use std::time::Duration;

/// Catalog site used when `CATALOG_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://tululu.org";

/// Main configuration structure for Tululu-Fetch
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub limits: FetchLimits,
    pub output: OutputConfig,
}

/// Remote catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root of the catalog site, e.g. `https://tululu.org`
    pub base_url: String,
}

/// Output directories
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory for downloaded book texts
    pub books_dir: PathBuf,

    /// Directory for downloaded cover images
    pub images_dir: PathBuf,
}

/// Retry and timeout limits applied to every request
///
/// The timeout used for attempt `k` (1-based) is
/// `min(read_timeout * 2^(k-1), max_backoff)`. The same value is slept
/// before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Timeout of the first attempt
    pub read_timeout: Duration,

    /// Cap on the per-attempt timeout and backoff sleep
    pub max_backoff: Duration,

    /// Total number of attempts, at least 1
    pub max_attempts: u32,
}

impl FetchLimits {
    pub fn new(read_timeout: Duration, max_backoff: Duration, max_attempts: u32) -> Self {
        Self {
            read_timeout,
            max_backoff,
            max_attempts,
        }
    }

    /// Timeout to use for the given 1-based attempt number
    pub fn timeout_for_attempt(&self, attempt: u32) -> Duration {
        let mut timeout = self.read_timeout.min(self.max_backoff);
        for _ in 1..attempt {
            timeout = self.next_timeout(timeout);
            if timeout == self.max_backoff {
                break;
            }
        }
        timeout
    }

    /// Doubles `current`, saturating at `max_backoff`
    pub fn next_timeout(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_backoff)
    }
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(5),
            max_backoff: Duration::from_secs(60),
            max_attempts: 5,
        }
    }
}
