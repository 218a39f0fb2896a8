//! Resolved article content.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Candidates must carry strictly more than this many characters.
pub const MIN_CONTENT_LENGTH: usize = 100;

/// Normalized content of one page.
///
/// Built once per page by the resolver and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Article title, or the document title, or empty
    pub title: String,
    /// Plain text, used for summaries and as a fallback body
    pub text: String,
    /// Sanitized, cleaned markup; `None` when only text is available
    pub html: Option<String>,
    /// Possibly empty
    pub excerpt: String,
    /// Possibly empty
    pub byline: String,
}

impl ContentRecord {
    /// Number of whitespace-separated words in `text`.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Stage of the fallback chain that produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "selector", rename_all = "snake_case")]
pub enum Tier {
    /// Structured extraction
    Readability,
    /// First `<article>` element
    ArticleElement,
    /// A common content-container selector
    ContentSelector(String),
    /// Cleaned `<body>`
    FilteredBody,
}

impl Tier {
    /// 1-based position in the fallback chain.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Readability => 1,
            Tier::ArticleElement => 2,
            Tier::ContentSelector(_) => 3,
            Tier::FilteredBody => 4,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Readability => write!(f, "readability"),
            Tier::ArticleElement => write!(f, "article element"),
            Tier::ContentSelector(selector) => write!(f, "selector {selector}"),
            Tier::FilteredBody => write!(f, "filtered body"),
        }
    }
}

/// A cached record together with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: Arc<ContentRecord>,
    pub tier: Tier,
}

/// Whether `text` passes the minimum length rule.
pub fn meets_min_length(text: &str, min_length: usize) -> bool {
    text.trim().chars().count() > min_length
}
