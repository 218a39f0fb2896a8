//! Element scoring used by the structured extractor.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::Element;

/// Configuration for content scoring
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Weight for positive class/ID patterns
    pub positive_weight: f64,
    /// Weight for negative class/ID patterns
    pub negative_weight: f64,
    /// Cap on the score earned from text length
    pub max_char_density_score: f64,
    /// Cap on the score earned from commas
    pub max_comma_density_score: f64,
    /// Characters per point of length score
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|tweet)")
        .expect("positive pattern compiles")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup)",
    )
    .expect("negative pattern compiles")
});

/// How likely a tag is to wrap the main content.
pub fn base_tag_score(tag_name: &str) -> f64 {
    match tag_name {
        "article" => 10.0,
        "section" => 8.0,
        "div" | "main" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Weight from the element's id and class names; the id is checked first.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let id = element.attr("id").unwrap_or_default();
    let class = element.attr("class").unwrap_or_default();

    std::iter::once(id)
        .chain(class.split_whitespace())
        .filter(|name| !name.is_empty())
        .find_map(|name| {
            if POSITIVE.is_match(name) {
                Some(config.positive_weight)
            } else if NEGATIVE.is_match(name) {
                Some(config.negative_weight)
            } else {
                None
            }
        })
        .unwrap_or(0.0)
}

/// Points for text length and comma count, each capped.
pub fn content_density_score(text: &str, config: &ScoreConfig) -> f64 {
    let chars = (text.chars().count() / config.chars_per_point.max(1)) as f64;
    let commas = text.matches(',').count() as f64;

    chars.min(config.max_char_density_score) + commas.min(config.max_comma_density_score)
}

/// Share of the element's text that sits inside links, from 0.0 to 1.0.
pub fn link_density(element: &Element<'_>) -> f64 {
    let total = element.text().chars().count();
    if total == 0 {
        return 0.0;
    }

    let linked: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    linked as f64 / total as f64
}

/// Final score of a single element before propagation to its ancestors.
///
/// Link-heavy elements are scaled down; elements that look like content
/// (positive class/id or long prose) are penalised half as much.
pub fn score_element(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let text = element.text();
    let class_weight = class_id_weight(element, config);
    let raw = base_tag_score(&element.tag_name()) + class_weight + content_density_score(&text, config);

    let density = link_density(element);
    let lenient = class_weight > 0.0 || text.chars().count() > 500;
    let penalty = if lenient { 1.0 - density * 0.5 } else { 1.0 - density };

    raw * penalty
}
