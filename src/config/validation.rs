use crate::config::types::{CatalogConfig, Config, FetchLimits, OutputConfig};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_catalog_config(&config.catalog)?;
    validate_fetch_limits(&config.limits)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the catalog base URL
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates retry and timeout limits
fn validate_fetch_limits(limits: &FetchLimits) -> Result<(), ConfigError> {
    if limits.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            limits.max_attempts
        )));
    }

    if limits.read_timeout == Duration::ZERO {
        return Err(ConfigError::Validation(
            "read_timeout must be greater than zero".to_string(),
        ));
    }

    if limits.read_timeout > limits.max_backoff {
        return Err(ConfigError::Validation(format!(
            "read_timeout ({:?}) must not exceed max_backoff ({:?})",
            limits.read_timeout, limits.max_backoff
        )));
    }

    Ok(())
}

/// Validates output directories
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.books_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "books_dir cannot be empty".to_string(),
        ));
    }

    if config.images_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "images_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
