//! Filename extraction from an artifact URL.

/// Returns the basename of `url`: the last non-empty path segment.
///
/// Query string and fragment are dropped when the URL parses. Unparseable
/// input falls back to the text after the last `/`. Returns `None` when there
/// is no usable segment (root path, `.` or `..`).
pub fn basename(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_owned)?,
        Err(_) => url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(str::to_owned)?,
    };
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}
