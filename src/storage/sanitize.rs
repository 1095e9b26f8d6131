/// Longest filename (in bytes) produced by [`sanitize_filename`]
pub(crate) const MAX_FILENAME_LEN: usize = 255;

/// Removes characters that are illegal or troublesome in filenames
///
/// Path separators, Windows-reserved punctuation, `&` and control characters
/// are dropped; trailing spaces and dots are trimmed; Windows device names get
/// an underscore suffix. An input that sanitizes to nothing becomes
/// `"untitled"`.
///
/// # Examples
///
/// ```
/// use tululu_fetch::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("5. War & Peace"), "5. War  Peace");
/// assert_eq!(sanitize_filename("a/b: c?"), "ab c");
/// ```
pub fn sanitize_filename(input: &str) -> String {
    sanitize_filename_within(input, MAX_FILENAME_LEN)
}

/// Like [`sanitize_filename`], but caps the result at `max_len` bytes
///
/// Used when a suffix such as an extension is appended afterwards, so the
/// full name stays within the filesystem limit.
pub fn sanitize_filename_within(input: &str, max_len: usize) -> String {
    let mut name: String = input.chars().filter(|c| !is_forbidden(*c)).collect();

    truncate_at_char_boundary(&mut name, max_len);
    let mut name = trim_name(&name).to_string();

    if name.is_empty() {
        return "untitled".to_string();
    }

    if is_reserved_windows_name(&name) {
        name.push('_');
    }
    name
}

/// Drops a trailing `.ext` from `name` if it looks like a file extension
///
/// Only a final dot followed by one or more ASCII alphanumerics counts, so
/// titles like `"1. Foo"` are left intact.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}

fn trim_name(name: &str) -> &str {
    name.trim_start()
        .trim_end_matches(|c: char| c == ' ' || c == '.')
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '&' | '\0'..='\u{1F}' | '\u{7F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

fn truncate_at_char_boundary(s: &mut String, max_len: usize) {
    if s.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
