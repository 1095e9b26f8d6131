//! HTML parser for book detail pages
//!
//! This module extracts a [`BookRecord`] from a catalog detail page:
//! - Title and author from the `<h1>` heading (`"Title :: Author"`)
//! - Cover image URL from `.bookimage img`
//! - Genre tags from the links inside `span.d_book`
//! - Reader comments from `span.black` inside each `div.texts`

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

const TITLE_AUTHOR_SEPARATOR: &str = "::";

/// Metadata extracted from one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// Absolute URL of the cover image
    pub image_url: Url,
    /// Genre tags in document order
    pub genres: Vec<String>,
    /// Reader comments in document order
    pub comments: Vec<String>,
}

impl BookRecord {
    /// Genres lowercased and joined with `", "`
    pub fn genres_line(&self) -> String {
        self.genres
            .iter()
            .map(|genre| genre.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The page was fetched but does not have the expected structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing <h1> heading")]
    MissingHeading,

    #[error("heading '{0}' has no '::' separator between title and author")]
    MissingSeparator(String),

    #[error("missing cover image (.bookimage img[src])")]
    MissingCoverImage,

    #[error("cover image src '{src}' cannot be resolved: {reason}")]
    InvalidImageUrl { src: String, reason: String },

    #[error("invalid selector '{0}'")]
    Selector(&'static str),
}

/// Parses a book detail page
///
/// # Arguments
///
/// * `html` - The detail page HTML
/// * `base_url` - URL the page was fetched from, for resolving relative links
///
/// # Returns
///
/// * `Ok(BookRecord)` - Successfully parsed page
/// * `Err(ParseError)` - Heading or cover image missing
///
/// # Example
///
/// ```
/// use tululu_fetch::catalog::parse_book_page;
/// use url::Url;
///
/// let html = r#"<html><body>
///     <h1>Dune :: Frank Herbert</h1>
///     <div class="bookimage"><a href="/b1/"><img src="/shots/1.jpg"></a></div>
/// </body></html>"#;
/// let base_url = Url::parse("https://tululu.org/b1/").unwrap();
/// let book = parse_book_page(html, &base_url).unwrap();
/// assert_eq!(book.title, "Dune");
/// assert_eq!(book.author, "Frank Herbert");
/// assert_eq!(book.image_url.as_str(), "https://tululu.org/shots/1.jpg");
/// ```
pub fn parse_book_page(html: &str, base_url: &Url) -> Result<BookRecord, ParseError> {
    let document = Html::parse_document(html);

    let (title, author) = extract_title_author(&document)?;
    let image_url = extract_image_url(&document, base_url)?;
    let genres = extract_genres(&document)?;
    let comments = extract_comments(&document)?;

    Ok(BookRecord {
        title,
        author,
        image_url,
        genres,
        comments,
    })
}

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Splits the first `<h1>` into title and author
fn extract_title_author(document: &Html) -> Result<(String, String), ParseError> {
    let heading = document
        .select(&selector("h1")?)
        .next()
        .map(element_text)
        .ok_or(ParseError::MissingHeading)?;

    let (title, author) = heading
        .split_once(TITLE_AUTHOR_SEPARATOR)
        .ok_or_else(|| ParseError::MissingSeparator(heading.trim().to_string()))?;

    Ok((title.trim().to_string(), author.trim().to_string()))
}

/// Resolves the cover image `src` against the page URL
fn extract_image_url(document: &Html, base_url: &Url) -> Result<Url, ParseError> {
    let src = document
        .select(&selector(".bookimage img")?)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or(ParseError::MissingCoverImage)?;

    base_url
        .join(src.trim())
        .map_err(|e| ParseError::InvalidImageUrl {
            src: src.to_string(),
            reason: e.to_string(),
        })
}

/// Link texts of the first `span.d_book`; empty if the page has none
fn extract_genres(document: &Html) -> Result<Vec<String>, ParseError> {
    let link_selector = selector("a")?;

    let genres: Vec<String> = document
        .select(&selector("span.d_book")?)
        .next()
        .map(|span| {
            span.select(&link_selector)
                .map(|link| element_text(link).trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(genres)
}

/// Comment text of each `div.texts`; containers without `span.black` are skipped
fn extract_comments(document: &Html) -> Result<Vec<String>, ParseError> {
    let comment_selector = selector("span.black")?;

    let comments: Vec<String> = document
        .select(&selector("div.texts")?)
        .filter_map(|container| container.select(&comment_selector).next())
        .map(element_text)
        .collect();

    Ok(comments)
}
