use url::Url;

/// Returns the last path segment of `url`, percent-decoded
///
/// The segment is kept verbatim so saved images match the remote naming.
/// Returns `None` when the path has no non-empty final segment, or when the
/// decoded segment could escape its directory (`/`, `\`, `.` or `..`).
///
/// # Examples
///
/// ```
/// use tululu_fetch::url::filename_from_url;
/// use url::Url;
///
/// let url = Url::parse("https://tululu.org/shots/9.jpg").unwrap();
/// assert_eq!(filename_from_url(&url).as_deref(), Some("9.jpg"));
/// ```
pub fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.last()?;
    if segment.is_empty() {
        return None;
    }

    let name = match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    };

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return None;
    }
    Some(name)
}
