//! Reader overlay state and its mount/unmount lifecycle.

use std::sync::LazyLock;

use regex::Regex;

use crate::announce::Announcement;
use crate::content::ContentRecord;
use crate::page::Page;
use crate::theme::Theme;
use crate::view::escape_text;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern compiles"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern compiles"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern compiles"));

/// Elements inside the first `<article>` tried as a subtitle, in order.
const SUBTITLE_SELECTORS: &[&str] = &[".subtitle", "h2", ".article-subtitle"];

/// What the content pane shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPane {
    Loading,
    Article(ArticleView),
}

/// The revealed article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleView {
    /// Root domain of the page
    pub source: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Sanitized markup
    pub body_html: String,
    /// Whether the entrance transition has started
    pub entered: bool,
}

impl ArticleView {
    pub fn new(record: &ContentRecord, page: &Page) -> Self {
        let body_html = match &record.html {
            Some(html) => html.clone(),
            None => format_content(&record.text),
        };

        Self {
            source: page.root_domain(),
            title: Some(record.title.trim().to_string()).filter(|t| !t.is_empty()),
            subtitle: resolve_subtitle(record, page),
            body_html,
            entered: false,
        }
    }
}

/// State of the navbar's summary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryButton {
    #[default]
    Idle,
    Generating,
    Showing,
}

impl SummaryButton {
    pub fn label(self) -> &'static str {
        match self {
            SummaryButton::Idle => "Summarize with AI",
            SummaryButton::Generating => "Generating",
            SummaryButton::Showing => "Hide AI Summary",
        }
    }
}

/// Bullet summary shown above the article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPanel {
    pub bullets: Vec<String>,
    pub visible: bool,
}

/// Everything a mounted overlay displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub theme: Theme,
    pub pane: ContentPane,
    pub summary: Option<SummaryPanel>,
    pub summary_button: SummaryButton,
    pub summary_enabled: bool,
    pub dropdown_open: bool,
    pub announcement: Option<&'static Announcement>,
}

impl Overlay {
    /// A freshly mounted shell with the loading placeholder.
    pub fn new(theme: Theme, summary_enabled: bool, announcement: Option<&'static Announcement>) -> Self {
        Self {
            theme,
            pane: ContentPane::Loading,
            summary: None,
            summary_button: SummaryButton::Idle,
            summary_enabled,
            dropdown_open: false,
            announcement,
        }
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.pane, ContentPane::Article(_))
    }

    pub fn article(&self) -> Option<&ArticleView> {
        match &self.pane {
            ContentPane::Article(article) => Some(article),
            ContentPane::Loading => None,
        }
    }
}

/// Holds at most one mounted overlay.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    overlay: Option<Overlay>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `overlay`, unmounting any overlay already present.
    pub fn open(&mut self, overlay: Overlay) {
        if self.close() {
            tracing::debug!("replaced mounted overlay");
        }
        self.overlay = Some(overlay);
    }

    /// Unmounts the overlay; `false` if nothing was mounted.
    pub fn close(&mut self) -> bool {
        self.overlay.take().is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    /// Replaces the loading placeholder with `article`.
    ///
    /// Does nothing when unmounted or already revealed.
    pub fn reveal(&mut self, article: ArticleView) -> bool {
        match self.overlay.as_mut() {
            Some(overlay) if !overlay.is_revealed() => {
                overlay.pane = ContentPane::Article(article);
                true
            }
            _ => false,
        }
    }

    /// Starts the body's entrance transition.
    pub fn enter(&mut self) -> bool {
        match self.overlay.as_mut().map(|o| &mut o.pane) {
            Some(ContentPane::Article(article)) if !article.entered => {
                article.entered = true;
                true
            }
            _ => false,
        }
    }
}

/// Subtitle priority: excerpt, then meta description, then a subtitle-like
/// element inside the first `<article>`.
pub fn resolve_subtitle(record: &ContentRecord, page: &Page) -> Option<String> {
    let excerpt = record.excerpt.trim();
    if !excerpt.is_empty() {
        return Some(excerpt.to_string());
    }

    if let Some(description) = page.document().meta_description() {
        return Some(description);
    }

    let article = page.document().select_first("article").ok()??;
    SUBTITLE_SELECTORS.iter().find_map(|selector| {
        let text = article.select_first(selector).ok()??.text();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

/// Turns plain text into paragraphs.
///
/// Blank lines split paragraphs, `**x**` becomes bold and `*x*` italic. The
/// text is escaped first, so markup in it renders literally.
pub fn format_content(text: &str) -> String {
    let escaped = escape_text(text);
    let paragraphs = PARAGRAPH_BREAK.replace_all(&escaped, "</p><p>");
    let wrapped = format!("<p>{paragraphs}</p>");
    let bold = BOLD.replace_all(&wrapped, "<strong>$1</strong>");
    ITALIC.replace_all(&bold, "<em>$1</em>").into_owned()
}
