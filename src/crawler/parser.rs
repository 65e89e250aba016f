//! HTML link extraction
//!
//! Only absolute `http://` and `https://` targets of `<a href>` tags are
//! followed. Relative links are ignored, and hrefs are kept as written
//! (trimmed) because frontier deduplication compares exact strings.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Pulls outbound hyperlinks out of a fetched page
///
/// Implementations must tolerate malformed markup and return whatever links
/// are recoverable, possibly none.
pub trait LinkExtractor: Send + Sync {
    /// Returns distinct links in document order
    fn extract_links(&self, content: &[u8]) -> Vec<String>;
}

/// [`LinkExtractor`] built on the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, content: &[u8]) -> Vec<String> {
        extract_links(&String::from_utf8_lossy(content))
    }
}

/// Extracts all absolute http(s) anchor targets from an HTML document
///
/// # Example
///
/// ```
/// use ripple_scraper::crawler::extract_links;
///
/// let html = r#"<a href="https://example.com/a">A</a><a href="/relative">B</a>"#;
/// assert_eq!(extract_links(html), vec!["https://example.com/a".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(link) = accept_link(href) {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
    }

    links
}

/// Returns the trimmed href if it is an absolute, parseable http(s) URL
fn accept_link(href: &str) -> Option<String> {
    let href = href.trim();

    let lowered = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
        return None;
    }

    match Url::parse(href) {
        Ok(url) if url.host_str().is_some() => Some(href.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        let links = extract_links(html);
        assert_eq!(links, vec!["https://other.com/page".to_string()]);
    }

    #[test]
    fn test_http_and_https_accepted() {
        let html = r#"<a href="http://a.com/">A</a><a href="HTTPS://b.com/">B</a>"#;
        let links = extract_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[1], "HTTPS://b.com/");
    }

    #[test]
    fn test_skip_relative_links() {
        let html = r#"<html><body><a href="/other">Link</a><a href="other">Link</a></body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_non_http_schemes() {
        let html = r#"
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="ftp://files.example.com/x">FTP</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
        "#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="top">Top</a><a href="https://example.com/">Home</a>"#;
        assert_eq!(extract_links(html).len(), 1);
    }

    #[test]
    fn test_only_anchor_tags() {
        let html = r#"
            <link rel="canonical" href="https://example.com/canonical" />
            <img src="https://example.com/img.png">
            <script src="https://example.com/app.js"></script>
        "#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_duplicates_collapse_in_document_order() {
        let html = r#"
            <a href="https://example.com/b">B</a>
            <a href="https://example.com/a">A</a>
            <a href="https://example.com/b">B again</a>
        "#;
        assert_eq!(
            extract_links(html),
            vec![
                "https://example.com/b".to_string(),
                "https://example.com/a".to_string()
            ]
        );
    }

    #[test]
    fn test_href_is_trimmed_but_not_normalized() {
        let html = r#"<a href="  https://Example.com/Path?b=2  ">x</a>"#;
        assert_eq!(
            extract_links(html),
            vec!["https://Example.com/Path?b=2".to_string()]
        );
    }

    #[test]
    fn test_malformed_html_does_not_fail() {
        let html = r#"<html><body><div><a href="https://example.com/ok">ok<p><a href="http://"#;
        assert_eq!(extract_links(html), vec!["https://example.com/ok".to_string()]);
    }

    #[test]
    fn test_extractor_on_non_utf8_bytes() {
        let mut content = b"<a href=\"https://example.com/x\">".to_vec();
        content.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        content.extend_from_slice(b"</a>");
        assert_eq!(
            HtmlLinkExtractor.extract_links(&content),
            vec!["https://example.com/x".to_string()]
        );
    }
}
