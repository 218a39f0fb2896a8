//! Ordered fallback chain that turns a page into a [`ContentRecord`].
//!
//! Tiers, first acceptable candidate wins:
//!
//! 1. Structured extraction with an [`ArticleExtractor`]
//! 2. The first `<article>` element
//! 3. The first element matching one of [`CONTENT_SELECTORS`]
//! 4. The page body, cleaned
//!
//! Every tier's markup goes through the [`Sanitizer`] and then
//! [`clean`] before it is stored.

use std::sync::Arc;

use crate::clean::clean;
use crate::content::{ContentRecord, MIN_CONTENT_LENGTH, Resolution, Tier, meets_min_length};
use crate::extract::{ArticleExtractor, ReadabilityExtractor};
use crate::page::Page;
use crate::parse::fragment_text;
use crate::preprocess::convert_relative_urls;
use crate::sanitize::{AmmoniaSanitizer, Sanitizer};

/// Common content containers, in priority order.
pub const CONTENT_SELECTORS: &[&str] = &[
    r#"main[role="main"]"#,
    r#"div[role="main"]"#,
    ".main-content",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
    "main",
];

/// Runs the fallback chain once per page and caches the result.
pub struct ContentResolver {
    extractor: Box<dyn ArticleExtractor>,
    sanitizer: Box<dyn Sanitizer>,
    min_length: usize,
    cached: Option<Resolution>,
}

impl Default for ContentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentResolver {
    pub fn new() -> Self {
        Self {
            extractor: Box::new(ReadabilityExtractor::new()),
            sanitizer: Box::new(AmmoniaSanitizer::new()),
            min_length: MIN_CONTENT_LENGTH,
            cached: None,
        }
    }

    /// Replaces the tier 1 extractor.
    pub fn with_extractor(mut self, extractor: impl ArticleExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    /// Candidates need strictly more than `min_length` characters.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Returns the cached resolution, running the chain on first use.
    ///
    /// `None` means no tier produced acceptable content; nothing is cached in
    /// that case, so a later call tries again.
    pub fn resolve(&mut self, page: &Page) -> Option<Resolution> {
        if let Some(cached) = &self.cached {
            return Some(cached.clone());
        }

        let resolution = self.run_chain(page)?;
        tracing::info!(tier = %resolution.tier, url = %page.url(), "resolved readable content");
        self.cached = Some(resolution.clone());
        Some(resolution)
    }

    pub fn cached(&self) -> Option<&Resolution> {
        self.cached.as_ref()
    }

    /// Drops the cached resolution.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    fn run_chain(&self, page: &Page) -> Option<Resolution> {
        self.from_extractor(page)
            .or_else(|| self.from_article_element(page))
            .or_else(|| self.from_content_selectors(page))
            .or_else(|| self.from_filtered_body(page))
    }

    fn from_extractor(&self, page: &Page) -> Option<Resolution> {
        let article = match self.extractor.extract(page.document()) {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!(error = %e, "structured extraction failed, falling back");
                return None;
            }
        };

        if !meets_min_length(&article.text_content, self.min_length) {
            tracing::debug!("structured extraction too short");
            return None;
        }

        let record = ContentRecord {
            title: article.title.filter(|t| !t.is_empty()).unwrap_or_else(|| page.title()),
            text: article.text_content.trim().to_string(),
            html: self.finish_html(&article.content, page),
            excerpt: article.excerpt.unwrap_or_default(),
            byline: article.byline.unwrap_or_default(),
        };
        Some(resolution(record, Tier::Readability))
    }

    fn from_article_element(&self, page: &Page) -> Option<Resolution> {
        let article = page.document().select_first("article").ok()??;
        let text = article.text();
        if !meets_min_length(&text, self.min_length) {
            tracing::debug!("<article> element too short");
            return None;
        }

        let record = self.plain_record(page, text, &article.inner_html());
        Some(resolution(record, Tier::ArticleElement))
    }

    fn from_content_selectors(&self, page: &Page) -> Option<Resolution> {
        CONTENT_SELECTORS.iter().find_map(|selector| {
            let element = page.document().select_first(selector).ok()??;
            let text = element.text();
            if !meets_min_length(&text, self.min_length) {
                tracing::debug!(selector, "content selector too short");
                return None;
            }

            let record = self.plain_record(page, text, &element.inner_html());
            Some(resolution(record, Tier::ContentSelector(selector.to_string())))
        })
    }

    fn from_filtered_body(&self, page: &Page) -> Option<Resolution> {
        let body = page.document().body()?;
        let cleaned = clean(&self.sanitizer.sanitize(&body.inner_html()));
        if !meets_min_length(&cleaned, self.min_length) {
            tracing::debug!("filtered body too short");
            return None;
        }

        let text = fragment_text(&cleaned);
        let record = ContentRecord {
            title: page.title(),
            text: text.trim().to_string(),
            html: Some(absolutize(cleaned.trim(), page)),
            ..Default::default()
        };
        Some(resolution(record, Tier::FilteredBody))
    }

    fn plain_record(&self, page: &Page, text: String, html: &str) -> ContentRecord {
        ContentRecord {
            title: page.title(),
            text: text.trim().to_string(),
            html: self.finish_html(html, page),
            ..Default::default()
        }
    }

    /// Sanitize, clean, and absolutize; blank results become `None`.
    fn finish_html(&self, html: &str, page: &Page) -> Option<String> {
        let cleaned = clean(&self.sanitizer.sanitize(html));
        let cleaned = cleaned.trim();
        (!cleaned.is_empty()).then(|| absolutize(cleaned, page))
    }
}

fn absolutize(html: &str, page: &Page) -> String {
    convert_relative_urls(html, page.url())
}

fn resolution(record: ContentRecord, tier: Tier) -> Resolution {
    Resolution { record: Arc::new(record), tier }
}
