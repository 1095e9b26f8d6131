use url::Url;

/// Builds the detail page URL for a book: `{base}/b{id}/`
///
/// # Examples
///
/// ```
/// use tululu_fetch::url::book_page_url;
///
/// let url = book_page_url("https://tululu.org", 9).unwrap();
/// assert_eq!(url.as_str(), "https://tululu.org/b9/");
/// ```
pub fn book_page_url(base_url: &str, book_id: u64) -> Result<Url, url::ParseError> {
    catalog_root(base_url)?.join(&format!("b{}/", book_id))
}

/// Builds the text download URL for a book: `{base}/txt.php?id={id}`
///
/// # Examples
///
/// ```
/// use tululu_fetch::url::text_download_url;
///
/// let url = text_download_url("https://tululu.org", 9).unwrap();
/// assert_eq!(url.as_str(), "https://tululu.org/txt.php?id=9");
/// ```
pub fn text_download_url(base_url: &str, book_id: u64) -> Result<Url, url::ParseError> {
    let mut url = catalog_root(base_url)?.join("txt.php")?;
    url.query_pairs_mut()
        .append_pair("id", &book_id.to_string());
    Ok(url)
}

/// Parses the base URL with a trailing slash so relative joins append to it
fn catalog_root(base_url: &str) -> Result<Url, url::ParseError> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(&format!("{}/", trimmed))
}
