use crate::storage::sanitize::{sanitize_filename_within, strip_extension, MAX_FILENAME_LEN};
use crate::storage::StoredAsset;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while writing assets to disk
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path} unusable: {message}")]
    OutputDir { path: String, message: String },

    #[error("failed to write {path}: {source}")]
    Io { path: String, source: io::Error },
}

/// How the final filename is derived from the caller's desired name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNaming {
    /// Strip any extension, sanitize, then append the canonical extension
    /// (including the leading dot, e.g. `".txt"`)
    Sanitized { extension: &'static str },

    /// Use the desired name as-is
    Verbatim,
}

impl FileNaming {
    fn apply(&self, desired: &str) -> String {
        match self {
            FileNaming::Sanitized { extension } => {
                let max_stem = MAX_FILENAME_LEN.saturating_sub(extension.len());
                let stem = sanitize_filename_within(strip_extension(desired), max_stem);
                format!("{}{}", stem, extension)
            }
            FileNaming::Verbatim => desired.to_string(),
        }
    }
}

/// Ensures `dir` exists as a directory, creating parents as needed
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    let output_dir_error = |message: String| PersistError::OutputDir {
        path: dir.display().to_string(),
        message,
    };

    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| output_dir_error(e.to_string()))?;
        if !meta.is_dir() {
            return Err(output_dir_error("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| output_dir_error(e.to_string()))?;
    }
    Ok(())
}

/// Writes `bytes` to `{target_dir}/{final filename}`
///
/// The target directory is created if missing. Any existing file at the
/// same path is overwritten.
///
/// # Arguments
///
/// * `bytes` - Payload to write, unmodified
/// * `target_dir` - Output directory
/// * `desired_filename` - Name before [`FileNaming`] is applied
/// * `naming` - Sanitization policy for the filename
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tululu_fetch::storage::{save_asset, FileNaming};
///
/// let stored = save_asset(
///     b"text",
///     Path::new("books"),
///     "1. Dune.txt",
///     FileNaming::Sanitized { extension: ".txt" },
/// )
/// .unwrap();
/// assert_eq!(stored.filepath, Path::new("books/1. Dune.txt"));
/// ```
pub fn save_asset(
    bytes: &[u8],
    target_dir: &Path,
    desired_filename: &str,
    naming: FileNaming,
) -> Result<StoredAsset, PersistError> {
    ensure_dir(target_dir)?;

    let filepath = target_dir.join(naming.apply(desired_filename));
    fs::write(&filepath, bytes).map_err(|source| PersistError::Io {
        path: filepath.display().to_string(),
        source,
    })?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), filepath.display());

    Ok(StoredAsset::new(filepath))
}
