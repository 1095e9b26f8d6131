//! Configuration module for Tululu-Fetch
//!
//! This module resolves the run configuration from the process environment
//! (optionally seeded from a `.env` file) and validates it once, before any
//! request is made.
//!
//! # Example
//!
//! ```no_run
//! use tululu_fetch::config::load_config;
//!
//! let config = load_config().unwrap();
//! println!("Books go to: {}", config.output.books_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CatalogConfig, Config, FetchLimits, OutputConfig, DEFAULT_BASE_URL};

// Re-export parser functions
pub use parser::{load_config, load_config_from};
