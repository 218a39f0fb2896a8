//! Declarative view tree for the reader overlay.
//!
//! [`overlay_view`] is a pure function of the overlay state and config. It
//! never touches the resolver or the network, so the whole overlay can be
//! checked in tests by walking the returned [`ViewNode`] or its HTML.

use crate::config::ReaderConfig;
use crate::overlay::{ArticleView, ContentPane, Overlay, SummaryButton, SummaryPanel};
use crate::theme::Theme;

const VOID_TAGS: &[&str] = &["img", "br", "hr", "meta", "link", "input"];

/// A node of the overlay tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Element { tag: &'static str, attrs: Vec<(&'static str, String)>, children: Vec<ViewNode> },
    /// Escaped on output
    Text(String),
    /// Trusted, already sanitized markup
    Raw(String),
}

impl ViewNode {
    pub fn element(tag: &'static str) -> Self {
        ViewNode::Element { tag, attrs: Vec::new(), children: Vec::new() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ViewNode::Text(text.into())
    }

    pub fn raw(html: impl Into<String>) -> Self {
        ViewNode::Raw(html.into())
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let ViewNode::Element { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: ViewNode) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = ViewNode>) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            ViewNode::Element { attrs, .. } => attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class").is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }

    /// First node in document order carrying `class`.
    pub fn find_class(&self, class: &str) -> Option<&ViewNode> {
        if self.has_class(class) {
            return Some(self);
        }
        match self {
            ViewNode::Element { children, .. } => children.iter().find_map(|child| child.find_class(class)),
            _ => None,
        }
    }

    /// Concatenated text of `Text` descendants; raw markup is skipped.
    pub fn text_content(&self) -> String {
        match self {
            ViewNode::Text(text) => text.clone(),
            ViewNode::Raw(_) => String::new(),
            ViewNode::Element { children, .. } => children.iter().map(ViewNode::text_content).collect(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text(text) => out.push_str(&escape_text(text)),
            ViewNode::Raw(html) => out.push_str(html),
            ViewNode::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(tag) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Builds the overlay tree.
pub fn overlay_view(overlay: &Overlay, config: &ReaderConfig) -> ViewNode {
    let mut root = ViewNode::element("div").class("hush-reader-overlay");
    if overlay.theme != Theme::Light {
        root = root.attr("data-theme", overlay.theme.key());
    }

    root = root.child(navbar(overlay, config));
    if overlay.dropdown_open {
        root = root.child(theme_dropdown(overlay.theme, config));
    }
    root = root.child(content_area(overlay, config));

    if let Some(announcement) = overlay.announcement {
        let paragraphs = announcement
            .body
            .split("\n\n")
            .map(|p| ViewNode::element("p").child(ViewNode::text(p)));
        let dialog = ViewNode::element("div")
            .class("hush-whatsnew-backdrop")
            .attr("role", "dialog")
            .attr("aria-modal", "true")
            .attr("data-action", "dismiss-announcement")
            .child(
                ViewNode::element("div")
                    .class("hush-whatsnew")
                    .child(
                        ViewNode::element("div")
                            .class("hush-whatsnew__header")
                            .child(ViewNode::element("h3").class("hush-whatsnew__title").child(ViewNode::text(announcement.title))),
                    )
                    .child(ViewNode::element("div").class("hush-whatsnew__label").child(ViewNode::text(announcement.label)))
                    .child(ViewNode::element("div").class("hush-whatsnew__body").children(paragraphs))
                    .child(
                        ViewNode::element("div").class("hush-whatsnew__footer").child(
                            ViewNode::element("button")
                                .class("hush-whatsnew__button hush-whatsnew__button--primary")
                                .attr("type", "button")
                                .attr("data-action", "dismiss-announcement")
                                .child(ViewNode::text("Got it")),
                        ),
                    ),
            );
        root = root.child(dialog);
    }

    root
}

/// Wraps the overlay in a standalone HTML document.
pub fn render_page(overlay: &Overlay, config: &ReaderConfig, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n<link rel=\"stylesheet\" href=\"{}\">\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_text(title),
        escape_attr(&config.asset("reader.css")),
        overlay_view(overlay, config).to_html()
    )
}

fn icon(config: &ReaderConfig, asset: &str, alt: &str) -> ViewNode {
    ViewNode::element("span").class("hush-btn__icon").attr("aria-hidden", "true").child(
        ViewNode::element("img")
            .class("hush-btn__svg")
            .attr("src", config.asset(asset))
            .attr("alt", alt),
    )
}

fn icon_button(config: &ReaderConfig, action: &'static str, label: &str, asset: &str, alt: &str) -> ViewNode {
    ViewNode::element("button")
        .class("hush-btn hush-btn--icon")
        .attr("type", "button")
        .attr("aria-label", label)
        .attr("data-action", action)
        .child(icon(config, asset, alt))
}

fn icon_link(config: &ReaderConfig, href: &str, label: &str, asset: &str, alt: &str) -> ViewNode {
    ViewNode::element("a")
        .class("hush-btn hush-btn--icon")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .attr("aria-label", label)
        .child(icon(config, asset, alt))
}

fn navbar(overlay: &Overlay, config: &ReaderConfig) -> ViewNode {
    let mut controls = ViewNode::element("div").class("hush-navbar-controls");

    if overlay.summary_enabled {
        controls = controls.child(summary_button(overlay.summary_button, config));
    }

    controls = controls
        .child(
            ViewNode::element("button")
                .class("hush-btn hush-btn--icon hush-btn--theme")
                .attr("type", "button")
                .attr("aria-label", "Choose theme")
                .attr("aria-haspopup", "menu")
                .attr("aria-expanded", overlay.dropdown_open.to_string())
                .attr("data-action", "toggle-theme")
                .child(icon(config, "theme-picker.svg", "Theme picker")),
        )
        .child(icon_link(config, &config.feedback_url, "Open feedback", "feedback.svg", "Feedback"))
        .child(icon_link(config, &config.about_url, "Open About page", "heart.svg", "About"))
        .child(icon_button(config, "close", "Close reader", "close-icon.svg", "Close"));

    ViewNode::element("nav")
        .class("hush-navbar")
        .attr("role", "navigation")
        .child(
            ViewNode::element("img")
                .class("hush-navbar-logo")
                .attr("src", config.asset(overlay.theme.logo()))
                .attr("alt", "Hush logo"),
        )
        .child(controls)
}

fn summary_button(state: SummaryButton, config: &ReaderConfig) -> ViewNode {
    let mut button = ViewNode::element("button").attr("type", "button").attr("data-action", "summarize");

    button = match state {
        SummaryButton::Idle => button.class("hush-btn hush-btn--primary").child(icon(config, "summary-icon.svg", "Summarize")),
        SummaryButton::Generating => button.class("hush-btn hush-btn--primary generating").attr("disabled", "disabled"),
        SummaryButton::Showing => button
            .class("hush-btn hush-btn--primary summary-visible")
            .child(icon(config, "eye-slash.svg", "Hide summary")),
    };

    button.child(ViewNode::element("span").class("hush-btn__label").child(ViewNode::text(state.label())))
}

fn theme_dropdown(current: Theme, config: &ReaderConfig) -> ViewNode {
    let items = Theme::ALL.iter().map(|theme| {
        ViewNode::element("button")
            .class("hush-dropdown__item")
            .attr("type", "button")
            .attr("role", "menuitemradio")
            .attr("aria-checked", (*theme == current).to_string())
            .attr("data-theme-key", theme.key())
            .child(
                ViewNode::element("span").class("hush-dropdown__icon").child(
                    ViewNode::element("img")
                        .attr("src", config.asset(theme.icon()))
                        .attr("alt", format!("{} theme", theme.label())),
                ),
            )
            .child(ViewNode::element("span").class("hush-dropdown__label").child(ViewNode::text(theme.label())))
    });

    ViewNode::element("div")
        .class("hush-dropdown")
        .attr("role", "menu")
        .attr("aria-label", "Theme picker")
        .children(items)
}

fn content_area(overlay: &Overlay, config: &ReaderConfig) -> ViewNode {
    let mut area = ViewNode::element("div").class("hush-reader-content");

    if let Some(panel) = &overlay.summary {
        area = area.child(summary_panel(panel, config));
    }

    match &overlay.pane {
        ContentPane::Loading => area.child(ViewNode::element("div").class("hush-loading").child(ViewNode::text("Loading article..."))),
        ContentPane::Article(article) => area.children(article_nodes(article)),
    }
}

fn summary_panel(panel: &SummaryPanel, config: &ReaderConfig) -> ViewNode {
    let class = if panel.visible { "hush-summary" } else { "hush-summary summary-hidden" };
    let bullets = panel
        .bullets
        .iter()
        .map(|line| ViewNode::element("p").class("hush-summary-bullet").child(ViewNode::text(line.as_str())));

    ViewNode::element("div")
        .class(class)
        .child(
            ViewNode::element("div")
                .class("hush-summary-label-row")
                .child(
                    ViewNode::element("img")
                        .class("hush-summary-icon")
                        .attr("src", config.asset("summary-icon.svg"))
                        .attr("alt", "Summary Icon"),
                )
                .child(ViewNode::element("span").class("hush-summary-label-text").child(ViewNode::text("AI Summary"))),
        )
        .child(ViewNode::element("div").class("hush-summary-bullets").children(bullets))
}

fn article_nodes(article: &ArticleView) -> Vec<ViewNode> {
    let mut nodes = vec![ViewNode::element("div").class("hush-article-source").child(ViewNode::text(article.source.as_str()))];

    if let Some(title) = &article.title {
        nodes.push(ViewNode::element("h1").class("hush-article-title").child(ViewNode::text(title.as_str())));
    }
    if let Some(subtitle) = &article.subtitle {
        nodes.push(ViewNode::element("div").class("hush-subtitle").child(ViewNode::text(subtitle.as_str())));
    }

    let class = if article.entered { "hush-article hush-article--entered" } else { "hush-article hush-article--entering" };
    nodes.push(ViewNode::element("div").class(class).child(ViewNode::raw(article.body_html.as_str())));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::ANNOUNCEMENTS;

    fn article(entered: bool) -> ArticleView {
        ArticleView {
            source: "example.com".to_string(),
            title: Some("A <Title>".to_string()),
            subtitle: None,
            body_html: "<p>Body</p>".to_string(),
            entered,
        }
    }

    #[test]
    fn test_escaping() {
        let node = ViewNode::element("a").attr("title", "\"quoted\" & <b>").child(ViewNode::text("1 < 2"));
        assert_eq!(node.to_html(), r#"<a title="&quot;quoted&quot; &amp; &lt;b&gt;">1 &lt; 2</a>"#);
    }

    #[test]
    fn test_void_elements_have_no_close_tag() {
        let node = ViewNode::element("img").attr("src", "a.png");
        assert_eq!(node.to_html(), r#"<img src="a.png">"#);
    }

    #[test]
    fn test_loading_shell() {
        let overlay = Overlay::new(Theme::Light, true, None);
        let view = overlay_view(&overlay, &ReaderConfig::default());

        assert!(view.get_attr("data-theme").is_none());
        assert_eq!(view.find_class("hush-loading").unwrap().text_content(), "Loading article...");
        assert!(view.find_class("hush-article").is_none());
        assert!(view.find_class("hush-dropdown").is_none());
        assert_eq!(
            view.find_class("hush-btn--primary").unwrap().text_content(),
            "Summarize with AI"
        );
    }

    #[test]
    fn test_dark_theme_uses_dark_logo() {
        let overlay = Overlay::new(Theme::Dark, false, None);
        let view = overlay_view(&overlay, &ReaderConfig::default());

        assert_eq!(view.get_attr("data-theme"), Some("dark"));
        assert_eq!(view.find_class("hush-navbar-logo").unwrap().get_attr("src"), Some("assets/logodark.png"));
        assert!(view.find_class("hush-btn--primary").is_none());
    }

    #[test]
    fn test_revealed_article() {
        let mut overlay = Overlay::new(Theme::Sepia, true, None);
        overlay.pane = ContentPane::Article(article(false));
        let view = overlay_view(&overlay, &ReaderConfig::default());

        assert_eq!(view.find_class("hush-article-source").unwrap().text_content(), "example.com");
        assert!(view.find_class("hush-article--entering").is_some());
        assert!(view.find_class("hush-subtitle").is_none());

        let html = view.to_html();
        assert!(html.contains("A &lt;Title&gt;"));
        assert!(html.contains("<p>Body</p>"));
        assert!(view.find_class("hush-loading").is_none());
    }

    #[test]
    fn test_dropdown_marks_current_theme() {
        let mut overlay = Overlay::new(Theme::Sepia, true, None);
        overlay.dropdown_open = true;
        let html = overlay_view(&overlay, &ReaderConfig::default()).to_html();

        assert!(html.contains(r#"aria-checked="true" data-theme-key="sepia""#));
        assert!(html.contains(r#"aria-checked="false" data-theme-key="light""#));
        assert!(html.contains(r#"aria-expanded="true""#));
    }

    #[test]
    fn test_summary_panel_states() {
        let mut overlay = Overlay::new(Theme::Light, true, None);
        overlay.summary = Some(SummaryPanel { bullets: vec!["• A.".to_string()], visible: false });
        overlay.summary_button = SummaryButton::Idle;
        let view = overlay_view(&overlay, &ReaderConfig::default());
        assert!(view.find_class("summary-hidden").is_some());

        overlay.summary.as_mut().unwrap().visible = true;
        overlay.summary_button = SummaryButton::Showing;
        let view = overlay_view(&overlay, &ReaderConfig::default());
        assert!(view.find_class("summary-hidden").is_none());
        assert_eq!(view.find_class("hush-summary-bullet").unwrap().text_content(), "• A.");
        assert_eq!(view.find_class("hush-btn--primary").unwrap().text_content(), "Hide AI Summary");
    }

    #[test]
    fn test_announcement_dialog() {
        let overlay = Overlay::new(Theme::Light, true, ANNOUNCEMENTS.first());
        let view = overlay_view(&overlay, &ReaderConfig::default());
        let dialog = view.find_class("hush-whatsnew-backdrop").unwrap();
        assert!(dialog.text_content().contains("Got it"));
    }

    #[test]
    fn test_render_page_is_a_document() {
        let overlay = Overlay::new(Theme::Light, false, None);
        let page = render_page(&overlay, &ReaderConfig::default(), "T & C");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>T &amp; C</title>"));
        assert!(page.contains("assets/reader.css"));
    }
}
