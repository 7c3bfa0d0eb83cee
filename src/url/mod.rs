//! URL handling module for Catalog Harvester
//!
//! Catalog markup carries relative hrefs and image sources; everything stored
//! in a record or navigated to is resolved against the configured base URL.

use url::Url;

/// Resolves an href or src against `base` and returns an absolute http(s) URL
///
/// Returns None if the link cannot be used:
/// - empty or whitespace-only values
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - fragment-only links (same page anchors)
/// - values that do not resolve to an http or https URL
///
/// # Examples
///
/// ```
/// use catalog_harvester::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.test/catalog/doors").unwrap();
/// assert_eq!(
///     resolve_url(&base, "/p/1").as_deref(),
///     Some("https://example.test/p/1")
/// );
/// ```
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.test/catalog/doors").unwrap()
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve_url(&base_url(), "/p/1").as_deref(),
            Some("https://example.test/p/1")
        );
    }

    #[test]
    fn test_resolve_path_relative() {
        assert_eq!(
            resolve_url(&base_url(), "oak-door").as_deref(),
            Some("https://example.test/catalog/oak-door")
        );
    }

    #[test]
    fn test_absolute_url_kept() {
        assert_eq!(
            resolve_url(&base_url(), "http://127.0.0.1:9000/i/1.jpg").as_deref(),
            Some("http://127.0.0.1:9000/i/1.jpg")
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            resolve_url(&base_url(), "//cdn.example.test/i/1.jpg").as_deref(),
            Some("https://cdn.example.test/i/1.jpg")
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            resolve_url(&base_url(), "  /p/2 \n").as_deref(),
            Some("https://example.test/p/2")
        );
    }

    #[test]
    fn test_unusable_links() {
        assert_eq!(resolve_url(&base_url(), ""), None);
        assert_eq!(resolve_url(&base_url(), "   "), None);
        assert_eq!(resolve_url(&base_url(), "#top"), None);
        assert_eq!(resolve_url(&base_url(), "javascript:void(0)"), None);
        assert_eq!(resolve_url(&base_url(), "JavaScript:void(0)"), None);
        assert_eq!(resolve_url(&base_url(), "mailto:shop@example.test"), None);
        assert_eq!(resolve_url(&base_url(), "tel:+70000000000"), None);
        assert_eq!(resolve_url(&base_url(), "data:image/png;base64,AAAA"), None);
        assert_eq!(resolve_url(&base_url(), "ftp://example.test/file"), None);
    }
}
