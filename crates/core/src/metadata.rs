//! Page metadata: title, byline, excerpt and description.

use serde_json::Value;

use crate::Document;

/// Longest text accepted as a byline found by class/id heuristics.
const MAX_BYLINE_CHARS: usize = 100;

/// Longest excerpt taken from the first paragraph.
const MAX_EXCERPT_CHARS: usize = 300;

impl Document {
    /// Extract title with priority fallback:
    /// 1. JSON-LD `headline`
    /// 2. Open Graph `og:title`
    /// 3. Twitter `twitter:title`
    /// 4. `<title>` element
    /// 5. First `<h1>` element
    pub fn extract_title(&self) -> Option<String> {
        self.json_ld_string("headline")
            .or_else(|| self.meta_content("og:title"))
            .or_else(|| self.meta_content("twitter:title"))
            .or_else(|| self.title().filter(|t| !t.is_empty()))
            .or_else(|| self.first_text("h1"))
    }

    /// Extract the byline with priority fallback:
    /// 1. JSON-LD `author` (string, object or array)
    /// 2. Meta `author`
    /// 3. `[rel="author"]`, then `[itemprop="author"]`
    /// 4. Short text in an element whose class contains "byline" or "author"
    pub fn extract_byline(&self) -> Option<String> {
        if let Some(author) = self.json_ld().as_ref().and_then(|ld| ld.get("author")).and_then(author_name) {
            return Some(author);
        }

        self.meta_content("author")
            .or_else(|| self.first_text(r#"[rel="author"]"#))
            .or_else(|| self.first_text(r#"[itemprop="author"]"#))
            .or_else(|| {
                ["byline", "author"].iter().find_map(|pattern| {
                    let elements = self.select(&format!(r#"[class*="{pattern}"]"#)).ok()?;
                    elements.iter().take(3).find_map(|el| {
                        let text = el.text();
                        let text = text.trim();
                        (!text.is_empty() && text.chars().count() < MAX_BYLINE_CHARS).then(|| text.to_string())
                    })
                })
            })
    }

    /// Extract an excerpt with priority fallback:
    /// 1. JSON-LD `description`
    /// 2. Open Graph `og:description`
    /// 3. Meta `description`
    /// 4. First paragraph longer than 50 characters
    pub fn extract_excerpt(&self) -> Option<String> {
        self.json_ld_string("description")
            .or_else(|| self.meta_content("og:description"))
            .or_else(|| self.meta_description())
            .or_else(|| {
                let paragraphs = self.select("p").ok()?;
                paragraphs.iter().take(5).find_map(|p| {
                    let text = p.text();
                    let text = text.trim();
                    (text.chars().count() > 50).then(|| truncate_chars(text, MAX_EXCERPT_CHARS))
                })
            })
    }

    /// Content of `<meta name="description">`, trimmed and non-empty.
    pub fn meta_description(&self) -> Option<String> {
        self.meta_content("description")
    }

    /// Get meta tag content by `name` or `property`, trimmed and non-empty.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        ["name", "property"].iter().find_map(|attr| {
            let el = self.select_first(&format!(r#"meta[{attr}="{key}"]"#)).ok()??;
            let content = el.attr("content")?.trim();
            (!content.is_empty()).then(|| content.to_string())
        })
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        let el = self.select_first(selector).ok()??;
        let text = el.text();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn json_ld_string(&self, key: &str) -> Option<String> {
        self.json_ld()?.get(key)?.as_str().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    }

    /// First JSON-LD block that parses.
    fn json_ld(&self) -> Option<Value> {
        let scripts = self.select(r#"script[type="application/ld+json"]"#).ok()?;
        scripts.iter().find_map(|el| serde_json::from_str::<Value>(el.text().trim()).ok())
    }
}

fn author_name(author: &Value) -> Option<String> {
    match author {
        Value::String(name) => Some(name.clone()),
        Value::Object(obj) => obj.get("name")?.as_str().map(str::to_string),
        Value::Array(items) => items.first().and_then(author_name),
        _ => None,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Test Page Title</title>
            <meta name="author" content="John Doe">
            <meta name="description" content="  A plain description.  ">
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG Description">
            <script type="application/ld+json">
            {
                "@type": "Article",
                "headline": "JSON-LD Headline",
                "author": [{ "@type": "Person", "name": "Jane Smith" }],
                "description": "JSON-LD Description"
            }
            </script>
        </head>
        <body><h1>Main Heading</h1><p>Short.</p></body>
        </html>
    "#;

    const HTML_WITHOUT_META: &str = r#"
        <html>
        <head><title>Simple Page</title></head>
        <body>
            <div class="post-byline">By Ada Lovelace</div>
            <p>Tiny.</p>
            <p>This paragraph is comfortably longer than fifty characters in total.</p>
        </body>
        </html>
    "#;

    #[test]
    fn test_title_prefers_json_ld() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.extract_title(), Some("JSON-LD Headline".to_string()));
    }

    #[test]
    fn test_title_falls_back_to_title_element() {
        let doc = Document::parse(HTML_WITHOUT_META).unwrap();
        assert_eq!(doc.extract_title(), Some("Simple Page".to_string()));
    }

    #[test]
    fn test_byline_from_json_ld_array() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.extract_byline(), Some("Jane Smith".to_string()));
    }

    #[test]
    fn test_byline_from_class_heuristic() {
        let doc = Document::parse(HTML_WITHOUT_META).unwrap();
        assert_eq!(doc.extract_byline(), Some("By Ada Lovelace".to_string()));
    }

    #[test]
    fn test_excerpt_priority() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.extract_excerpt(), Some("JSON-LD Description".to_string()));

        let doc = Document::parse(HTML_WITHOUT_META).unwrap();
        assert_eq!(
            doc.extract_excerpt(),
            Some("This paragraph is comfortably longer than fifty characters in total.".to_string())
        );
    }

    #[test]
    fn test_meta_description_is_trimmed() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.meta_description(), Some("A plain description.".to_string()));

        let doc = Document::parse(HTML_WITHOUT_META).unwrap();
        assert_eq!(doc.meta_description(), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }
}
