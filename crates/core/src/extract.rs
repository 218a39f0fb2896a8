//! Structured article extraction, the first tier of the resolver.
//!
//! The extractor never touches the caller's document: it serializes it,
//! preprocesses the copy, and scores the copy.

use std::cmp::Ordering;
use std::collections::HashMap;

use scraper::ElementRef;

use crate::parse::{Document, Element, fragment_text};
use crate::scoring::{ScoreConfig, link_density, score_element};
use crate::{HushError, Result};

/// What the structured extractor found.
#[derive(Debug, Clone, Default)]
pub struct ExtractedArticle {
    /// Best available title for the page
    pub title: Option<String>,
    /// Unsanitized article markup
    pub content: String,
    /// Text of `content`
    pub text_content: String,
    /// Short description or lead paragraph
    pub excerpt: Option<String>,
    /// Author line
    pub byline: Option<String>,
}

/// Locates the primary article of a page.
///
/// Implementations may fail freely; the resolver treats any error as "no
/// candidate" and moves on to the next tier.
pub trait ArticleExtractor {
    fn extract(&self, document: &Document) -> Result<ExtractedArticle>;
}

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum score the top candidate must reach
    pub min_score_threshold: f64,
    /// Non-container candidates need at least a tenth of this many characters
    pub char_threshold: usize,
    /// Maximum elements to score (0 = unlimited)
    pub max_elements: usize,
    /// Siblings scoring at least this fraction of the top score are kept
    pub sibling_threshold: f64,
    /// Per-element scoring weights
    pub score: ScoreConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: 20.0,
            char_threshold: 500,
            max_elements: 1000,
            sibling_threshold: 0.2,
            score: ScoreConfig::default(),
        }
    }
}

/// Tags that are considered potential content containers
const CANDIDATE_TAGS: &[&str] = &["div", "article", "section", "main", "p", "td", "pre", "blockquote"];

/// Scoring-based [`ArticleExtractor`].
#[derive(Debug, Clone, Default)]
pub struct ReadabilityExtractor {
    config: ExtractConfig,
}

impl ReadabilityExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Picks the best-scoring container and its qualifying siblings.
    fn extract_content(&self, doc: &Document) -> Result<String> {
        let config = &self.config;
        let max_elements = if config.max_elements == 0 { usize::MAX } else { config.max_elements };

        let mut scores = HashMap::new();
        let mut elements: HashMap<_, Element<'_>> = HashMap::new();
        let mut scanned = 0usize;

        'scan: for tag in CANDIDATE_TAGS {
            for element in doc.select(tag)? {
                if scanned >= max_elements {
                    break 'scan;
                }
                scanned += 1;

                let is_container = matches!(*tag, "article" | "section" | "main");
                if !is_container && element.text().trim().chars().count() < config.char_threshold / 10 {
                    continue;
                }

                let own = score_element(&element, &config.score);
                let id = element.element_ref().id();
                scores.entry(id).or_insert(own);
                elements.entry(id).or_insert_with(|| element.clone());

                let ancestors = std::iter::successors(element.parent(), Element::parent)
                    .filter(|ancestor| ancestor.tag_name() != "html")
                    .take(2);
                for (depth, ancestor) in ancestors.enumerate() {
                    let divisor = if depth == 0 { 2.0 } else { 3.0 };
                    let ancestor_id = ancestor.element_ref().id();
                    *scores
                        .entry(ancestor_id)
                        .or_insert_with(|| score_element(&ancestor, &config.score)) += own / divisor;
                    elements.entry(ancestor_id).or_insert(ancestor);
                }
            }
        }

        let (top_id, top) = elements
            .iter()
            .max_by(|(a_id, a), (b_id, b)| {
                let a_score: f64 = scores[*a_id];
                let b_score: f64 = scores[*b_id];
                a_score
                    .partial_cmp(&b_score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| candidate_priority(&a.tag_name()).cmp(&candidate_priority(&b.tag_name())))
                    .then_with(|| a.text().chars().count().cmp(&b.text().chars().count()))
            })
            .ok_or_else(|| HushError::ExtractorFailed("no content candidates".to_string()))?;

        let top_score = scores[top_id];
        if top_score < config.min_score_threshold {
            return Err(HushError::ExtractorFailed(format!(
                "best candidate scored {:.1}, below threshold {:.1}",
                top_score, config.min_score_threshold
            )));
        }

        tracing::debug!(tag = %top.tag_name(), score = top_score, "structured extraction picked a candidate");

        let Some(parent) = top.parent() else {
            return Ok(top.outer_html());
        };

        let sibling_floor = top_score * config.sibling_threshold;
        let parts: Vec<String> = parent
            .element_ref()
            .children()
            .filter_map(ElementRef::wrap)
            .map(Element::from_ref)
            .filter(|child| {
                let child_id = child.element_ref().id();
                if child_id == *top_id {
                    return true;
                }
                match scores.get(&child_id) {
                    Some(score) if *score >= sibling_floor => {
                        child.tag_name() != "p"
                            || (child.text().chars().count() > 80 && link_density(child) < 0.25)
                    }
                    _ => false,
                }
            })
            .map(|child| child.outer_html())
            .collect();

        Ok(parts.join("\n"))
    }
}

impl ArticleExtractor for ReadabilityExtractor {
    fn extract(&self, document: &Document) -> Result<ExtractedArticle> {
        let copy = Document::parse_with_preprocessing(&document.as_string(), document.base_url().cloned())?;
        let content = self.extract_content(&copy)?;
        let text_content = fragment_text(&content);

        Ok(ExtractedArticle {
            title: document.extract_title(),
            content,
            text_content,
            excerpt: document.extract_excerpt(),
            byline: document.extract_byline(),
        })
    }
}

fn candidate_priority(tag_name: &str) -> u8 {
    match tag_name {
        "article" | "main" | "section" => 3,
        "div" => 2,
        _ => 1,
    }
}
