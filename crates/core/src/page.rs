//! The host page a reader session runs against.

use url::Url;

use crate::parse::Document;
use crate::{HushError, Result};

/// A parsed page and the URL it was loaded from.
///
/// The document is read-only for the lifetime of a session; extraction works
/// on serialized copies.
pub struct Page {
    url: Url,
    document: Document,
}

impl Page {
    /// Parses `html` loaded from `url`.
    pub fn parse(html: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| HushError::InvalidUrl(e.to_string()))?;
        Self::from_url(html, url)
    }

    pub fn from_url(html: &str, url: Url) -> Result<Self> {
        let document = Document::parse_with_url(html, url.clone())?;
        Ok(Self { url, document })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Document `<title>`, or empty.
    pub fn title(&self) -> String {
        self.document.title().unwrap_or_default()
    }

    /// Last two dot-separated labels of the host.
    ///
    /// Hosts with two labels or fewer (and IP addresses) come back whole.
    pub fn root_domain(&self) -> String {
        let Some(host) = self.url.host_str() else {
            return String::new();
        };
        if self.url.host().is_some_and(|h| !matches!(h, url::Host::Domain(_))) {
            return host.to_string();
        }

        let labels: Vec<&str> = host.split('.').filter(|label| !label.is_empty()).collect();
        match labels.len() {
            0..=2 => labels.join("."),
            n => labels[n - 2..].join("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.example.com/a", "example.com")]
    #[case("https://blog.news.example.org/post", "example.org")]
    #[case("https://example.com", "example.com")]
    #[case("http://localhost:8080/", "localhost")]
    #[case("http://127.0.0.1/page", "127.0.0.1")]
    fn test_root_domain(#[case] url: &str, #[case] expected: &str) {
        let page = Page::parse("<html></html>", url).unwrap();
        assert_eq!(page.root_domain(), expected);
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(Page::parse("<p>x</p>", "not a url"), Err(HushError::InvalidUrl(_))));
    }

    #[test]
    fn test_title_defaults_to_empty() {
        let page = Page::parse("<html><body></body></html>", "https://example.com").unwrap();
        assert_eq!(page.title(), "");

        let page = Page::parse("<title> Hello </title>", "https://example.com").unwrap();
        assert_eq!(page.title(), "Hello");
        assert_eq!(page.document().base_url().map(Url::as_str), Some("https://example.com/"));
    }
}
