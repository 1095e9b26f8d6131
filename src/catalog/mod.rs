//! Catalog module for book fetching and processing
//!
//! This module contains the core download logic, including:
//! - HTTP fetching with retry and exponential backoff
//! - Redirect-based "book not found" detection
//! - Detail page parsing
//! - Per-id orchestration over a range of book ids

mod coordinator;
mod fetcher;
mod parser;
mod redirect;

pub use coordinator::{run_range, Coordinator, DownloadedBook, RunReport};
pub use fetcher::{build_http_client, fetch, FetchError, FetchedPage, TransientError};
pub use parser::{parse_book_page, BookRecord, ParseError};
pub use redirect::{is_not_found, RedirectChain, MAX_REDIRECTS};

use crate::storage::PersistError;
use thiserror::Error;
use url::Url;

/// Failure downloading a single book
///
/// Every variant carries the book id so the orchestrator can report it and
/// move on to the next id.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book with ID {book_id} not found, redirect occurred ({url})")]
    NotFound { book_id: u64, url: Url },

    #[error("Book {book_id}: {source}")]
    Fetch { book_id: u64, source: FetchError },

    #[error("Book {book_id}: malformed page at {url}: {source}")]
    MalformedPage {
        book_id: u64,
        url: Url,
        source: ParseError,
    },

    #[error("Book {book_id}: cover image URL {url} has no usable filename")]
    MissingImageName { book_id: u64, url: Url },

    #[error("Book {book_id}: cover image {url} unavailable: {source}")]
    Image {
        book_id: u64,
        url: Url,
        source: FetchError,
    },

    #[error("Book {book_id}: {source}")]
    Persist { book_id: u64, source: PersistError },

    #[error("Book {book_id}: invalid URL: {source}")]
    Url {
        book_id: u64,
        source: ::url::ParseError,
    },
}

impl BookError {
    /// Wraps a fetch failure, promoting not-found to its own variant
    pub fn from_fetch(book_id: u64, error: FetchError) -> Self {
        match error {
            FetchError::NotFound { url } => BookError::NotFound { book_id, url },
            source => BookError::Fetch { book_id, source },
        }
    }

    /// The id of the book that failed
    pub fn book_id(&self) -> u64 {
        match self {
            BookError::NotFound { book_id, .. }
            | BookError::Fetch { book_id, .. }
            | BookError::MalformedPage { book_id, .. }
            | BookError::MissingImageName { book_id, .. }
            | BookError::Image { book_id, .. }
            | BookError::Persist { book_id, .. }
            | BookError::Url { book_id, .. } => *book_id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BookError::NotFound { .. })
    }
}
