//! URL handling module for Tululu-Fetch
//!
//! This module builds the catalog's fixed-shape URLs (detail page and text
//! download endpoint) and derives local filenames from remote asset URLs.

mod catalog;
mod filename;

// Re-export main functions
pub use catalog::{book_page_url, text_download_url};
pub use filename::filename_from_url;
