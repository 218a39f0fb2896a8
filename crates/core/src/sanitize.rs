//! HTML sanitization before content is re-inserted into a page.

use ammonia::Builder;

/// Makes untrusted markup safe to render.
pub trait Sanitizer {
    fn sanitize(&self, html: &str) -> String;
}

/// [`Sanitizer`] backed by `ammonia`.
///
/// Scripts, event handlers, inline styles and unknown tags are removed.
/// `class`, `id` and `role` survive so the cleaner can still recognise page
/// chrome after sanitization.
#[derive(Debug, Clone, Default)]
pub struct AmmoniaSanitizer;

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        Self
    }

    fn builder() -> Builder<'static> {
        let mut builder = Builder::default();
        builder
            .add_generic_attributes(&["class", "id", "role"])
            .add_tags(&["article", "main", "section", "figure", "figcaption", "nav", "header", "footer", "aside"])
            .strip_comments(true);
        builder
    }
}

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        Self::builder().clean(html).to_string()
    }
}
