use crate::config::types::{CatalogConfig, Config, FetchLimits, OutputConfig, DEFAULT_BASE_URL};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const BOOKS_DIRECTORY: &str = "BOOKS_DIRECTORY";
const IMAGES_DIRECTORY: &str = "IMAGES_DIRECTORY";
const REQUESTS_TIMEOUT: &str = "REQUESTS_TIMEOUT";
const REQUESTS_MAX_RETRIES_TIMEOUT: &str = "REQUESTS_MAX_RETRIES_TIMEOUT";
const REQUESTS_MAX_RETRIES_ATTEMPTS: &str = "REQUESTS_MAX_RETRIES_ATTEMPTS";
const CATALOG_BASE_URL: &str = "CATALOG_BASE_URL";

/// Loads the configuration from the process environment
///
/// A `.env` file in the working directory (or any parent) is loaded first if
/// present; variables already set in the environment take precedence.
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - A value failed to parse or validate, or `.env` is unreadable
pub fn load_config() -> Result<Config, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    load_config_from(|key| std::env::var(key).ok())
}

/// Builds a configuration from an arbitrary key lookup
///
/// Missing keys fall back to their defaults. Empty values count as missing.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use tululu_fetch::config::load_config_from;
///
/// let vars = HashMap::from([("REQUESTS_TIMEOUT", "2")]);
/// let config = load_config_from(|key| vars.get(key).map(|v| v.to_string())).unwrap();
/// assert_eq!(config.limits.read_timeout.as_secs(), 2);
/// ```
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let books_dir = get(BOOKS_DIRECTORY).unwrap_or_else(|| "books".to_string());
    let images_dir = get(IMAGES_DIRECTORY).unwrap_or_else(|| "images".to_string());
    let base_url = get(CATALOG_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let read_timeout: u64 = parse_or(get(REQUESTS_TIMEOUT), REQUESTS_TIMEOUT, 5)?;
    let max_backoff: u64 = parse_or(
        get(REQUESTS_MAX_RETRIES_TIMEOUT),
        REQUESTS_MAX_RETRIES_TIMEOUT,
        60,
    )?;
    let max_attempts: u32 = parse_or(
        get(REQUESTS_MAX_RETRIES_ATTEMPTS),
        REQUESTS_MAX_RETRIES_ATTEMPTS,
        5,
    )?;

    let config = Config {
        catalog: CatalogConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        },
        limits: FetchLimits::new(
            Duration::from_secs(read_timeout),
            Duration::from_secs(max_backoff),
            max_attempts,
        ),
        output: OutputConfig {
            books_dir: PathBuf::from(books_dir),
            images_dir: PathBuf::from(images_dir),
        },
    };

    validate(&config)?;

    Ok(config)
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                key: key.to_string(),
                value: raw,
            }),
    }
}
