//! Storage module for persisting downloaded assets
//!
//! This module writes fetched payloads (book texts and cover images) to flat
//! files under the configured output directories:
//! - Directory creation (idempotent, including parents)
//! - Filename sanitization for titles taken from remote pages
//! - Overwrite-on-write semantics for repeated runs
//!
//! A single run per output directory is assumed; concurrent runs writing the
//! same id could race on the same path.

mod files;
mod sanitize;

pub use files::{ensure_dir, save_asset, FileNaming, PersistError};
pub use sanitize::{sanitize_filename, sanitize_filename_within, strip_extension};

use std::path::PathBuf;

/// A file written by [`save_asset`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Path of the written file, `target_dir` joined with the final filename
    pub filepath: PathBuf,
}

impl StoredAsset {
    pub fn new(filepath: PathBuf) -> Self {
        Self { filepath }
    }
}
