//! Markup preparation for the structured extractor and link fixing for
//! resolved content.

use std::sync::LazyLock;

use lol_html::{HtmlRewriter, Settings, element};
use regex::Regex;
use url::Url;

static UNLIKELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup)",
    )
    .expect("unlikely-candidate pattern compiles")
});

static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|tweet)")
        .expect("candidate pattern compiles")
});

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("hidden-style pattern compiles")
});

const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas"];

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern compiles"));

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Drop script, style, noscript, iframe, svg and canvas subtrees
    pub remove_non_content: bool,
    /// Drop containers whose class/id looks like page chrome
    pub remove_unlikely: bool,
    /// Drop elements hidden with inline styles or the `hidden` attribute
    pub remove_hidden: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_non_content: true, remove_unlikely: true, remove_hidden: true }
    }
}

/// Prepares a copy of a page for scoring.
///
/// Returns the input unchanged if the rewriter rejects it.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let without_comments = COMMENT.replace_all(html, "");

    let remove_unlikely = config.remove_unlikely;
    let remove_hidden = config.remove_hidden;

    let mut handlers = Vec::new();
    if config.remove_non_content {
        for tag in NON_CONTENT_TAGS {
            handlers.push(element!(*tag, |el| {
                el.remove();
                Ok(())
            }));
        }
    }

    handlers.push(element!("*", move |el| {
        if el.removed() {
            return Ok(());
        }

        if remove_hidden {
            let hidden_by_style = el.get_attribute("style").is_some_and(|style| HIDDEN_STYLE.is_match(&style));
            if hidden_by_style || el.has_attribute("hidden") {
                el.remove();
                return Ok(());
            }
        }

        if remove_unlikely && !matches!(el.tag_name().as_str(), "html" | "body" | "article" | "main") {
            let id = el.get_attribute("id").unwrap_or_default();
            let class = el.get_attribute("class").unwrap_or_default();
            let names = class.split_whitespace().chain(std::iter::once(id.as_str()));
            let unlikely = names
                .filter(|name| !name.is_empty())
                .any(|name| UNLIKELY.is_match(name) && !MAYBE_CANDIDATE.is_match(name));
            if unlikely {
                el.remove();
            }
        }

        Ok(())
    }));

    rewrite(&without_comments, handlers).unwrap_or_else(|| html.to_string())
}

/// Makes `href` and `src` attributes absolute against `base_url`.
///
/// Fragment-only links are left alone so they keep pointing into the page.
pub fn convert_relative_urls(html: &str, base_url: &Url) -> String {
    let handlers = vec![
        element!("a[href]", |el| {
            if let Some(href) = el.get_attribute("href")
                && !href.starts_with('#')
                && let Ok(absolute) = base_url.join(&href)
            {
                el.set_attribute("href", absolute.as_str()).ok();
            }
            Ok(())
        }),
        element!("img[src]", |el| {
            if let Some(src) = el.get_attribute("src")
                && let Ok(absolute) = base_url.join(&src)
            {
                el.set_attribute("src", absolute.as_str()).ok();
            }
            Ok(())
        }),
    ];

    rewrite(html, handlers).unwrap_or_else(|| html.to_string())
}

/// Runs a set of element handlers over `html`.
///
/// `None` means lol_html refused the input.
pub(crate) fn rewrite<'h>(
    html: &str, element_content_handlers: Vec<(std::borrow::Cow<'h, lol_html::Selector>, lol_html::ElementContentHandlers<'h>)>,
) -> Option<String> {
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = HtmlRewriter::new(
        Settings { element_content_handlers, ..Default::default() },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(html.as_bytes()).ok()?;
    rewriter.end().ok()?;

    Some(String::from_utf8_lossy(&output).into_owned())
}
