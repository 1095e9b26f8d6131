//! Tululu-Fetch: a book catalog downloader
//!
//! This crate walks a range of numeric book ids on a catalog site, parses each
//! book's detail page and saves the cover image and plain-text body to disk.
//! Every request goes through a retrying fetcher that tells "book does not
//! exist" apart from transient network failures.

pub mod catalog;
pub mod config;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for startup failures
///
/// Per-book failures never surface here; they are reported as
/// [`catalog::BookError`] and the run moves on to the next id.
#[derive(Debug, Error)]
pub enum TululuError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid number for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

/// Result type alias for startup operations
pub type Result<T> = std::result::Result<T, TululuError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{BookError, BookRecord, FetchError};
pub use config::{Config, FetchLimits};
pub use storage::StoredAsset;
