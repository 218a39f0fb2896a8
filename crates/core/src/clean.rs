//! Heuristic cleanup of extracted article markup.
//!
//! [`clean`] strips the parts of a page that survive extraction but do not
//! belong in a reader view: site chrome, logos, icons, navigation links,
//! screen-reader helpers, and whatever empty wrappers those removals leave
//! behind. Matching is by tag, class, role and attribute patterns only, so
//! false positives are expected.

use lol_html::element;
use scraper::{Html, Node};

use crate::preprocess::rewrite;

/// Site chrome removed wholesale.
pub const CHROME_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "aside",
    ".nav",
    ".navbar",
    ".navigation",
    ".menu",
    ".header",
    ".footer",
    ".sidebar",
    ".aside",
    ".breadcrumb",
    ".breadcrumbs",
    ".social-share",
    ".share-buttons",
    ".author-bio",
    ".related-posts",
    ".comments",
    ".advertisement",
    ".ads",
    ".ad",
    r#"[role="navigation"]"#,
    r#"[role="banner"]"#,
    r#"[role="contentinfo"]"#,
];

/// Images inside these containers are treated as logos.
const LOGO_CONTAINERS: &[&str] = &[".logo img", ".brand img", ".site-logo img"];

/// Links that only move around the site.
pub const NAV_LINK_SELECTORS: &[&str] = &[
    r##"a[href^="#"]"##,
    r#"a[href="/"]"#,
    r#"a[href^="/category"]"#,
    r#"a[href^="/tag"]"#,
    ".nav-link",
    ".menu-item a",
];

/// Accessibility helpers that read badly outside their page.
pub const HIDDEN_UTILITY_SELECTORS: &[&str] = &[".skip-link", ".screen-reader-text", ".sr-only", ".visually-hidden"];

const ICON_PATTERNS: &[&str] = &["icon", "sprite", "bullet", "arrow", "social"];

/// Images with both dimensions under this are icons.
pub const ICON_MAX_DIMENSION: u32 = 50;

const EMPTY_CANDIDATES: &[&str] = &["p", "div", "span"];


/// Removes navigation, chrome, ads, logos, icons and empty nodes.
///
/// Pure: the output depends only on `html`, and cleaning twice gives the same
/// result as cleaning once.
pub fn clean(html: &str) -> String {
    if html.trim().is_empty() {
        return html.to_string();
    }

    let stripped = strip_noise(html).unwrap_or_else(|| html.to_string());
    remove_empty_nodes(&stripped)
}

fn strip_noise(html: &str) -> Option<String> {
    let mut handlers = Vec::new();

    let removable = CHROME_SELECTORS
        .iter()
        .chain(LOGO_CONTAINERS)
        .chain(NAV_LINK_SELECTORS)
        .chain(HIDDEN_UTILITY_SELECTORS);
    for selector in removable {
        handlers.push(element!(*selector, |el| {
            el.remove();
            Ok(())
        }));
    }

    handlers.push(element!("img", |el| {
        let attr = |name: &str| el.get_attribute(name).unwrap_or_default().to_lowercase();
        let (alt, src, class, id) = (attr("alt"), attr("src"), attr("class"), attr("id"));

        let is_logo = [&alt, &src, &class, &id].iter().any(|value| value.contains("logo"));
        let is_icon = ICON_PATTERNS
            .iter()
            .any(|pattern| class.contains(pattern) || src.contains(pattern) || alt.contains(pattern));
        let is_tiny = matches!(
            (dimension(el.get_attribute("width")), dimension(el.get_attribute("height"))),
            (Some(w), Some(h)) if w < ICON_MAX_DIMENSION && h < ICON_MAX_DIMENSION
        );

        if is_logo || is_icon || is_tiny {
            el.remove();
        }
        Ok(())
    }));

    rewrite(html, handlers)
}

/// Parses a `width`/`height` attribute; zero counts as unknown.
fn dimension(value: Option<String>) -> Option<u32> {
    let value = value?;
    let digits: String = value.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|n| *n > 0)
}

/// Drops whitespace-only `p`/`div`/`span` until none are left.
///
/// Works on the parsed tree, so stray `<` in text can never be joined into
/// a new tag by a removal.
fn remove_empty_nodes(html: &str) -> String {
    let mut fragment = Html::parse_fragment(html);
    loop {
        let empty: Vec<_> = fragment
            .tree
            .nodes()
            .filter(|node| {
                let is_candidate = node
                    .value()
                    .as_element()
                    .is_some_and(|el| EMPTY_CANDIDATES.contains(&el.name()));
                is_candidate
                    && node
                        .children()
                        .all(|child| matches!(child.value(), Node::Text(text) if text.trim().is_empty()))
            })
            .map(|node| node.id())
            .collect();

        if empty.is_empty() {
            return fragment.root_element().inner_html();
        }
        for id in empty {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::nav("<nav><a href=\"/x\">Menu</a></nav>")]
    #[case::header("<header>Site header</header>")]
    #[case::footer_class("<div class=\"footer\">Copyright</div>")]
    #[case::ad("<div class=\"ad\">Buy now</div>")]
    #[case::role_banner("<div role=\"banner\">Banner</div>")]
    #[case::breadcrumbs("<ol class=\"breadcrumbs\"><li>Home</li></ol>")]
    #[case::comments("<section class=\"comments\">Nice post</section>")]
    #[case::sr_only("<span class=\"sr-only\">Skip</span>")]
    #[case::skip_link("<a class=\"skip-link\" href=\"/main\">Skip to content</a>")]
    fn test_chrome_is_removed(#[case] noise: &str) {
        let html = format!("<p>Body text stays.</p>{noise}");
        assert_eq!(clean(&html), "<p>Body text stays.</p>");
    }

    #[rstest]
    #[case::hash(r##"<a href="#top">Back to top</a>"##)]
    #[case::root(r#"<a href="/">Home</a>"#)]
    #[case::category(r#"<a href="/category/news">News</a>"#)]
    #[case::tag(r#"<a href="/tag/rust">Rust</a>"#)]
    #[case::nav_link(r#"<a class="nav-link" href="/about">About</a>"#)]
    fn test_navigation_links_are_removed(#[case] link: &str) {
        let html = format!("<p>Read this {link}</p>");
        assert_eq!(clean(&html), "<p>Read this </p>");
    }

    #[test]
    fn test_menu_item_links_are_removed() {
        let html = r#"<ul><li class="menu-item"><a href="/a">A</a></li></ul><p>Text</p>"#;
        assert_eq!(clean(html), r#"<ul><li class="menu-item"></li></ul><p>Text</p>"#);
    }

    #[test]
    fn test_content_links_are_kept() {
        let html = r#"<p>See <a href="https://example.com/paper">the paper</a>.</p>"#;
        assert_eq!(clean(html), html);
    }

    #[rstest]
    #[case::alt(r#"<img alt="Company Logo" src="/a.png">"#)]
    #[case::src(r#"<img src="/static/LOGO-dark.png">"#)]
    #[case::class(r#"<img class="site-logo-img" src="/a.png">"#)]
    #[case::id(r#"<img id="logo" src="/a.png" width="800" height="600">"#)]
    #[case::container(r#"<div class="brand"><img src="/a.png"></div>"#)]
    #[case::icon(r#"<img class="share-icon" src="/a.png">"#)]
    #[case::sprite(r#"<img src="/img/sprite.png">"#)]
    #[case::social(r#"<img alt="social" src="/a.png">"#)]
    #[case::tiny(r#"<img src="/a.png" width="16" height="16">"#)]
    fn test_decorative_images_are_removed(#[case] image: &str) {
        let html = format!("<p>Caption</p>{image}");
        assert_eq!(clean(&html), "<p>Caption</p>");
    }

    #[rstest]
    #[case::large(r#"<img src="/photo.jpg" width="640" height="480">"#)]
    #[case::one_small_dimension(r#"<img src="/photo.jpg" width="30" height="480">"#)]
    #[case::unknown_size(r#"<img src="/photo.jpg" alt="A harbour at dusk">"#)]
    fn test_article_images_are_kept(#[case] image: &str) {
        let html = format!("<figure>{image}</figure>");
        assert_eq!(clean(&html), html);
    }

    #[test]
    fn test_empty_wrappers_collapse() {
        let html = "<div><p> </p><span>\n</span></div><p>Kept</p>";
        assert_eq!(clean(html), "<p>Kept</p>");
    }

    #[test]
    fn test_wrappers_emptied_by_removal_collapse() {
        let html = r#"<div class="top"><div><img class="icon" src="/i.png"></div></div><p>Kept</p>"#;
        assert_eq!(clean(html), "<p>Kept</p>");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let html = r##"
            <div class="wrapper">
                <header><img alt="logo" src="/logo.png"></header>
                <nav class="navbar"><a href="/">Home</a></nav>
                <p>First paragraph with <a href="#fn1">a footnote</a> and <a href="https://example.org">a source</a>.</p>
                <div><span class="screen-reader-text">Share</span></div>
                <figure><img src="/photo.jpg" width="640" height="480"></figure>
                <aside>Related</aside>
            </div>
        "##;

        let once = clean(html);
        let twice = clean(&once);
        assert_eq!(once, twice);
        assert!(once.contains("First paragraph"));
        assert!(once.contains("photo.jpg"));
        assert!(!once.contains("logo"));
    }

    #[test]
    fn test_stray_angle_bracket_stays_text() {
        let html = r#"<div>1 <<p></p>p class="nav">kept text</div>"#;

        let once = clean(html);
        assert_eq!(clean(&once), once);
        assert!(once.contains("kept text"));
        assert!(!once.contains("<p"));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(clean("   "), "   ");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(dimension(Some("48".to_string())), Some(48));
        assert_eq!(dimension(Some("48px".to_string())), Some(48));
        assert_eq!(dimension(Some("0".to_string())), None);
        assert_eq!(dimension(Some("auto".to_string())), None);
        assert_eq!(dimension(None), None);
    }
}
