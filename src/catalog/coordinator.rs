//! Download coordinator - per-id orchestration over a range of book ids
//!
//! For each id the coordinator:
//! - Fetches and parses the detail page
//! - Downloads the cover image (failures are logged, not fatal for the id)
//! - Downloads the text body through the catalog's download endpoint
//! - Prints a short summary of the saved book
//!
//! Ids are processed strictly one after another. A failure for one id is
//! logged and the run continues with the next.

use crate::catalog::fetcher::{build_http_client, fetch};
use crate::catalog::parser::{parse_book_page, BookRecord};
use crate::catalog::BookError;
use crate::config::Config;
use crate::storage::{save_asset, FileNaming, StoredAsset};
use crate::url::{book_page_url, filename_from_url, text_download_url};
use crate::TululuError;
use reqwest::Client;
use std::ops::RangeInclusive;

const TEXT_NAMING: FileNaming = FileNaming::Sanitized { extension: ".txt" };

/// A book whose text was saved
#[derive(Debug, Clone)]
pub struct DownloadedBook {
    pub book_id: u64,
    pub record: BookRecord,
    /// Saved text body
    pub text: StoredAsset,
    /// Saved cover image, if that download succeeded
    pub image: Option<StoredAsset>,
}

impl DownloadedBook {
    /// Human-readable summary printed after each book
    pub fn summary(&self) -> String {
        format!(
            "Title: {}\nAuthor: {}\nGenres: {}\nFile: '{}'",
            self.record.title,
            self.record.author,
            self.record.genres_line(),
            self.text.filepath.display()
        )
    }
}

/// Per-run counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Ids whose text was saved
    pub downloaded: Vec<u64>,
    /// Ids the catalog redirected away from
    pub not_found: Vec<u64>,
    /// Ids that failed for any other reason
    pub failed: Vec<u64>,
    /// Ids whose cover image could not be saved (text may still be saved)
    pub image_failures: Vec<u64>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.not_found.len() + self.failed.len()
    }
}

/// Main download coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
}

impl Coordinator {
    /// Creates a coordinator with a freshly built HTTP client
    pub fn new(config: Config) -> Result<Self, TululuError> {
        let client = build_http_client()?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a coordinator around an existing client
    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    /// Downloads every id in `ids`, in order
    ///
    /// Per-id failures are logged and counted; they never stop the run.
    pub async fn run(&self, ids: RangeInclusive<u64>) -> RunReport {
        if ids.is_empty() {
            tracing::warn!(
                "Empty id range {}..={}, nothing to download",
                ids.start(),
                ids.end()
            );
        } else {
            tracing::info!("Downloading books {} to {}", ids.start(), ids.end());
        }

        let mut report = RunReport::default();

        for book_id in ids {
            match self.download_book(book_id).await {
                Ok(book) => {
                    println!("{}\n", book.summary());
                    if book.image.is_none() {
                        report.image_failures.push(book.book_id);
                    }
                    report.downloaded.push(book.book_id);
                }
                Err(e) if e.is_not_found() => {
                    tracing::error!("{}", e);
                    report.not_found.push(book_id);
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    report.failed.push(book_id);
                }
            }
        }

        tracing::info!(
            "Run finished: {} downloaded, {} not found, {} failed",
            report.downloaded.len(),
            report.not_found.len(),
            report.failed.len()
        );

        report
    }

    /// Downloads one book: detail page, cover image, then text
    ///
    /// A cover image failure is logged and recorded as `image: None`; the
    /// text download is attempted regardless.
    pub async fn download_book(&self, book_id: u64) -> Result<DownloadedBook, BookError> {
        let base_url = &self.config.catalog.base_url;
        let limits = &self.config.limits;

        let page_url =
            book_page_url(base_url, book_id).map_err(|source| BookError::Url { book_id, source })?;
        tracing::debug!("Fetching detail page {}", page_url);

        let page = fetch(&self.client, &page_url, limits)
            .await
            .map_err(|e| BookError::from_fetch(book_id, e))?;

        let record =
            parse_book_page(&page.text(), &page_url).map_err(|source| BookError::MalformedPage {
                book_id,
                url: page_url.clone(),
                source,
            })?;

        let image = match self.download_image(book_id, &record).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        };

        let text = self.download_text(book_id, &record).await?;

        Ok(DownloadedBook {
            book_id,
            record,
            text,
            image,
        })
    }

    async fn download_image(
        &self,
        book_id: u64,
        record: &BookRecord,
    ) -> Result<StoredAsset, BookError> {
        let image_url = &record.image_url;
        let filename = filename_from_url(image_url).ok_or_else(|| BookError::MissingImageName {
            book_id,
            url: image_url.clone(),
        })?;

        let image = fetch(&self.client, image_url, &self.config.limits)
            .await
            .map_err(|source| BookError::Image {
                book_id,
                url: image_url.clone(),
                source,
            })?;

        save_asset(
            &image.body,
            &self.config.output.images_dir,
            &filename,
            FileNaming::Verbatim,
        )
        .map_err(|source| BookError::Persist { book_id, source })
    }

    async fn download_text(
        &self,
        book_id: u64,
        record: &BookRecord,
    ) -> Result<StoredAsset, BookError> {
        let text_url = text_download_url(&self.config.catalog.base_url, book_id)
            .map_err(|source| BookError::Url { book_id, source })?;

        let text = fetch(&self.client, &text_url, &self.config.limits)
            .await
            .map_err(|e| BookError::from_fetch(book_id, e))?;

        let filename = format!("{}. {}.txt", book_id, record.title);
        save_asset(
            &text.body,
            &self.config.output.books_dir,
            &filename,
            TEXT_NAMING,
        )
        .map_err(|source| BookError::Persist { book_id, source })
    }
}

/// Runs a complete download over `start_id..=end_id`
///
/// This is the main entry point used by the binary.
pub async fn run_range(config: Config, start_id: u64, end_id: u64) -> Result<RunReport, TululuError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(start_id..=end_id).await)
}
