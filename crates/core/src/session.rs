//! Reader session: one activation of the reader on one page view.
//!
//! The session owns every piece of per-page state (cached content, cached
//! summary, the mounted overlay, pending notices) and is the only place that
//! tears it down. All operations go through `&mut self`, so nothing here
//! needs locking.

use std::sync::Arc;
use std::time::{Duration, Instant};

use url::Url;

use crate::announce;
use crate::config::ReaderConfig;
use crate::content::{ContentRecord, Resolution};
use crate::navigation::{NavigationWatcher, UrlPoller};
use crate::overlay::{ArticleView, Overlay, OverlayRenderer, SummaryButton, SummaryPanel};
use crate::page::Page;
use crate::resolver::ContentResolver;
use crate::storage::{MemoryStorage, Storage};
use crate::summary::{SummaryClient, SummaryRecord};
use crate::theme::{SystemPreference, Theme, ThemeManager};
use crate::view::{overlay_view, render_page};
use crate::{HushError, Result};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub raised_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), raised_at: Instant::now(), ttl: NOTICE_TTL }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= self.ttl
    }
}

/// Result of a summary request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The summary panel is now visible
    Shown,
    /// A cached summary was hidden
    Hidden,
    /// Nothing was displayed: the feature is off or the overlay is gone
    Ignored,
}

/// Next step after checking the cache.
enum SummaryStep {
    Done(SummaryOutcome),
    Fetch(Arc<ContentRecord>),
}

/// Drives the reader on one page.
pub struct ReaderSession {
    config: ReaderConfig,
    page: Page,
    resolver: ContentResolver,
    renderer: OverlayRenderer,
    summary_client: SummaryClient,
    cached_summary: Option<Arc<SummaryRecord>>,
    themes: ThemeManager,
    storage: Box<dyn Storage>,
    system: SystemPreference,
    watcher: Box<dyn NavigationWatcher>,
    notices: Vec<Notice>,
}

impl ReaderSession {
    /// Creates a session with in-memory storage and the default resolver.
    pub fn new(page: Page, config: ReaderConfig) -> Result<Self> {
        let summary_client = SummaryClient::new(config.summary_config())?;
        let resolver = ContentResolver::new().with_min_length(config.min_content_length);
        let watcher = UrlPoller::new(page.url().clone());

        Ok(Self {
            config,
            page,
            resolver,
            renderer: OverlayRenderer::new(),
            summary_client,
            cached_summary: None,
            themes: ThemeManager::new(),
            storage: Box::new(MemoryStorage::new()),
            system: SystemPreference::default(),
            watcher: Box::new(watcher),
            notices: Vec::new(),
        })
    }

    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn with_resolver(mut self, resolver: ContentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_system_preference(mut self, system: SystemPreference) -> Self {
        self.system = system;
        self
    }

    pub fn with_watcher(mut self, watcher: impl NavigationWatcher + 'static) -> Self {
        self.watcher = Box::new(watcher);
        self
    }

    /// Handles the activation trigger.
    ///
    /// Toggles: an active session closes and reports success. Otherwise the
    /// content is resolved (once per page) and the shell is mounted with the
    /// loading placeholder. `false` means there was nothing readable; a
    /// notice has been queued and nothing is mounted.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            self.close();
            return true;
        }

        if self.resolver.resolve(&self.page).is_none() {
            let err = HushError::ExtractionFailure;
            tracing::warn!(url = %self.page.url(), "{}", err);
            self.notify(err.user_message());
            return false;
        }

        let theme = self.themes.resolve(self.storage.as_ref(), self.system);
        let announcement = announce::pending(self.storage.as_ref(), &self.config.version);
        self.renderer.open(Overlay::new(theme, self.config.summary_enabled, announcement));
        tracing::info!(%theme, url = %self.page.url(), "reader opened");
        true
    }

    /// Activates and runs the staged reveal: content after the reveal delay,
    /// then the entrance transition after the entrance delay.
    pub async fn open(&mut self) -> bool {
        let was_active = self.is_active();
        if !self.activate() {
            return false;
        }
        if was_active {
            return true;
        }

        tokio::time::sleep(self.config.reveal_delay()).await;
        self.reveal();
        tokio::time::sleep(self.config.entrance_delay()).await;
        self.renderer.enter();
        true
    }

    /// Replaces the loading placeholder with the article.
    pub fn reveal(&mut self) -> bool {
        let Some(resolution) = self.resolver.cached() else {
            return false;
        };
        let article = ArticleView::new(&resolution.record, &self.page);
        self.renderer.reveal(article)
    }

    /// Starts the entrance transition of a revealed article.
    pub fn enter(&mut self) -> bool {
        self.renderer.enter()
    }

    /// Unmounts the overlay and its dropdown. Caches survive.
    pub fn close(&mut self) {
        if self.renderer.close() {
            tracing::info!("reader closed");
        }
    }

    /// Full teardown: closes and clears both caches.
    pub fn cleanup(&mut self) {
        self.close();
        self.resolver.invalidate();
        self.cached_summary = None;
    }

    /// Key press while the overlay is mounted. Escape closes everything.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.is_active() {
            self.close();
            return true;
        }
        false
    }

    /// Reports the current URL; a change is treated as a full teardown.
    pub fn navigate(&mut self, url: &Url) -> bool {
        if !self.watcher.observe(url) {
            return false;
        }
        tracing::info!(%url, "navigation detected, tearing down reader");
        self.cleanup();
        true
    }

    /// Swaps in the page after a navigation. Anything resolved from the old
    /// document is dropped even when the URL did not change.
    pub fn load_page(&mut self, page: Page) {
        if !self.navigate(page.url()) {
            self.cleanup();
        }
        self.page = page;
    }

    /// Summary button handler.
    ///
    /// With a cached summary this only toggles the panel. Otherwise one
    /// request is sent; failures revert the button and queue a notice before
    /// the error is returned.
    pub async fn request_summary(&mut self) -> Result<SummaryOutcome> {
        let record = match self.prepare_summary()? {
            SummaryStep::Done(outcome) => return Ok(outcome),
            SummaryStep::Fetch(record) => record,
        };

        let result = self.summary_client.request_summary(&record).await;
        self.finish_summary(result)
    }

    fn prepare_summary(&mut self) -> Result<SummaryStep> {
        if !self.config.summary_enabled || !self.is_active() {
            return Ok(SummaryStep::Done(SummaryOutcome::Ignored));
        }

        if let Some(summary) = self.cached_summary.clone() {
            return Ok(SummaryStep::Done(self.toggle_summary(&summary)));
        }

        let record = self.resolver.cached().map(|r| Arc::clone(&r.record)).ok_or(HushError::ExtractionFailure)?;
        if let Some(overlay) = self.renderer.overlay_mut() {
            overlay.summary_button = SummaryButton::Generating;
        }
        Ok(SummaryStep::Fetch(record))
    }

    fn finish_summary(&mut self, result: Result<SummaryRecord>) -> Result<SummaryOutcome> {
        match result {
            Ok(summary) => {
                let summary = Arc::new(summary);
                self.cached_summary = Some(Arc::clone(&summary));
                if !self.is_active() {
                    tracing::debug!("summary arrived after the reader closed");
                    return Ok(SummaryOutcome::Ignored);
                }
                self.display_summary(&summary);
                Ok(SummaryOutcome::Shown)
            }
            Err(e) => {
                tracing::warn!(error = %e, "summary request failed");
                if let Some(overlay) = self.renderer.overlay_mut() {
                    overlay.summary_button = SummaryButton::Idle;
                }
                self.notify(e.user_message());
                Err(e)
            }
        }
    }

    fn toggle_summary(&mut self, summary: &SummaryRecord) -> SummaryOutcome {
        let Some(overlay) = self.renderer.overlay_mut() else {
            return SummaryOutcome::Ignored;
        };

        if let Some(panel) = overlay.summary.as_mut() {
            panel.visible = !panel.visible;
            let visible = panel.visible;
            overlay.summary_button = if visible { SummaryButton::Showing } else { SummaryButton::Idle };
            return if visible { SummaryOutcome::Shown } else { SummaryOutcome::Hidden };
        }

        // Reopened overlay: the panel is gone but the summary is still cached.
        self.display_summary(summary);
        SummaryOutcome::Shown
    }

    fn display_summary(&mut self, summary: &SummaryRecord) {
        if let Some(overlay) = self.renderer.overlay_mut() {
            overlay.summary = Some(SummaryPanel { bullets: summary.bullets(), visible: true });
            overlay.summary_button = SummaryButton::Showing;
        }
    }

    /// Opens or closes the theme dropdown.
    pub fn toggle_theme_dropdown(&mut self) -> bool {
        match self.renderer.overlay_mut() {
            Some(overlay) => {
                overlay.dropdown_open = !overlay.dropdown_open;
                overlay.dropdown_open
            }
            None => false,
        }
    }

    /// Picker selection: applies, persists, and closes the dropdown.
    pub fn select_theme(&mut self, theme: Theme) {
        self.themes.select(self.storage.as_mut(), theme);
        if let Some(overlay) = self.renderer.overlay_mut() {
            overlay.theme = theme;
            overlay.dropdown_open = false;
        }
    }

    /// Applies `theme` for this session only.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.themes.apply(theme);
        if let Some(overlay) = self.renderer.overlay_mut() {
            overlay.theme = theme;
        }
    }

    /// A click anywhere outside the dropdown and its button.
    pub fn click_outside(&mut self) {
        if let Some(overlay) = self.renderer.overlay_mut() {
            overlay.dropdown_open = false;
        }
    }

    /// Closes the "what's new" dialog and remembers it was seen.
    pub fn dismiss_announcement(&mut self) -> bool {
        let Some(announcement) = self.renderer.overlay_mut().and_then(|o| o.announcement.take()) else {
            return false;
        };
        announce::mark_seen(self.storage.as_mut(), announcement.version);
        true
    }

    /// Drains queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Drops notices whose lifetime has passed.
    pub fn expire_notices(&mut self, now: Instant) {
        self.notices.retain(|notice| !notice.is_expired(now));
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn notify(&mut self, message: String) {
        self.notices.push(Notice::new(message));
    }

    /// HTML of the mounted overlay.
    pub fn render(&self) -> Option<String> {
        self.renderer.overlay().map(|overlay| overlay_view(overlay, &self.config).to_html())
    }

    /// The mounted overlay as a standalone HTML document.
    pub fn render_document(&self) -> Option<String> {
        let overlay = self.renderer.overlay()?;
        let title = self.resolver.cached().map(|r| r.record.title.clone()).unwrap_or_else(|| self.page.title());
        Some(render_page(overlay, &self.config, &title))
    }

    pub fn is_active(&self) -> bool {
        self.renderer.is_mounted()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.renderer.overlay()
    }

    pub fn theme(&self) -> Theme {
        self.themes.current()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolver.cached()
    }

    pub fn cached_summary(&self) -> Option<&SummaryRecord> {
        self.cached_summary.as_deref()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Tier;

    fn article_page() -> Page {
        let body = "The committee met on Tuesday to discuss the harbour plan. ".repeat(10);
        let html = format!(
            r#"<html><head><title>Harbour</title><meta name="description" content="Plans for the harbour"></head>
            <body><nav>Menu</nav><article><h1>Harbour</h1><p>{body}</p></article></body></html>"#
        );
        Page::parse(&html, "https://news.example.com/harbour").unwrap()
    }

    fn empty_page() -> Page {
        Page::parse("<html><body><nav>Menu</nav><p>Hi.</p></body></html>", "https://example.com/").unwrap()
    }

    fn config() -> ReaderConfig {
        ReaderConfig::builder()
            .reveal_delay_ms(0)
            .entrance_delay_ms(0)
            .summary_endpoint("http://127.0.0.1:9/unused")
            .version("0.0.0-test")
            .build()
    }

    fn session(page: Page) -> ReaderSession {
        ReaderSession::new(page, config()).unwrap()
    }

    fn summary(text: &str) -> SummaryRecord {
        SummaryRecord { summary: text.to_string(), title: None, author: None, date_published: None, word_count: None }
    }

    #[test]
    fn test_activate_toggles() {
        let mut session = session(article_page());

        assert!(session.activate());
        assert!(session.is_active());
        assert!(!session.overlay().unwrap().is_revealed());

        assert!(session.activate());
        assert!(!session.is_active());
        assert!(session.resolution().is_some());
    }

    #[test]
    fn test_no_content_queues_notice() {
        let mut session = session(empty_page());

        assert!(!session.activate());
        assert!(!session.is_active());
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "No readable content found on this page.");
        assert_eq!(notices[0].ttl, NOTICE_TTL);
        assert!(session.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_open_reveals_and_enters() {
        let mut session = session(article_page());

        assert!(session.open().await);
        let article = session.overlay().unwrap().article().unwrap();
        assert_eq!(article.source, "example.com");
        assert_eq!(article.title.as_deref(), Some("Harbour"));
        assert!(article.entered);

        let html = session.render().unwrap();
        assert!(html.contains("harbour plan"));
        assert!(!html.contains("Loading article..."));
    }

    #[test]
    fn test_escape_and_dropdown() {
        let mut session = session(article_page());
        assert!(!session.handle_key("Escape"));

        session.activate();
        assert!(session.toggle_theme_dropdown());
        session.click_outside();
        assert!(!session.overlay().unwrap().dropdown_open);

        session.toggle_theme_dropdown();
        assert!(!session.handle_key("Enter"));
        assert!(session.handle_key("Escape"));
        assert!(!session.is_active());
    }

    #[test]
    fn test_select_theme_persists_and_closes_dropdown() {
        let mut session = session(article_page());
        session.activate();
        session.toggle_theme_dropdown();
        session.select_theme(Theme::Sepia);

        let overlay = session.overlay().unwrap();
        assert_eq!(overlay.theme, Theme::Sepia);
        assert!(!overlay.dropdown_open);
        assert_eq!(session.theme(), Theme::Sepia);
    }

    #[test]
    fn test_system_preference_applies_on_open() {
        let mut session = session(article_page()).with_system_preference(SystemPreference::Dark);
        session.activate();
        assert_eq!(session.overlay().unwrap().theme, Theme::Dark);
    }

    #[test]
    fn test_navigation_clears_caches() {
        let mut session = session(article_page());
        session.activate();
        session.cached_summary = Some(Arc::new(summary("• A")));

        assert!(!session.navigate(&Url::parse("https://news.example.com/harbour").unwrap()));
        assert!(session.navigate(&Url::parse("https://news.example.com/other").unwrap()));
        assert!(!session.is_active());
        assert!(session.resolution().is_none());
        assert!(session.cached_summary().is_none());
    }

    #[test]
    fn test_finish_summary_after_close_is_ignored() {
        let mut session = session(article_page());
        session.activate();
        assert!(matches!(session.prepare_summary().unwrap(), SummaryStep::Fetch(_)));
        session.close();

        let outcome = session.finish_summary(Ok(summary("• A. • B."))).unwrap();
        assert_eq!(outcome, SummaryOutcome::Ignored);
        assert!(session.cached_summary().is_some());
    }

    #[test]
    fn test_summary_failure_reverts_button() {
        let mut session = session(article_page());
        session.activate();
        assert!(matches!(session.prepare_summary().unwrap(), SummaryStep::Fetch(_)));
        assert_eq!(session.overlay().unwrap().summary_button, SummaryButton::Generating);

        let err = session
            .finish_summary(Err(HushError::MalformedResponse("no summary field".to_string())))
            .unwrap_err();
        assert!(matches!(err, HushError::MalformedResponse(_)));
        assert_eq!(session.overlay().unwrap().summary_button, SummaryButton::Idle);
        assert_eq!(session.take_notices()[0].message, "Failed to generate summary. Please try again.");
    }

    #[tokio::test]
    async fn test_cached_summary_toggles_without_request() {
        let mut session = session(article_page());
        session.activate();
        session.finish_summary(Ok(summary("• A. • B. **C**."))).unwrap();
        assert_eq!(session.overlay().unwrap().summary.as_ref().unwrap().bullets, vec!["• A.", "• B. C."]);

        assert_eq!(session.request_summary().await.unwrap(), SummaryOutcome::Hidden);
        assert_eq!(session.overlay().unwrap().summary_button, SummaryButton::Idle);
        assert_eq!(session.request_summary().await.unwrap(), SummaryOutcome::Shown);

        session.close();
        session.activate();
        assert!(session.overlay().unwrap().summary.is_none());
        assert_eq!(session.request_summary().await.unwrap(), SummaryOutcome::Shown);
        assert!(session.overlay().unwrap().summary.as_ref().unwrap().visible);
    }

    #[tokio::test]
    async fn test_summary_ignored_when_disabled_or_closed() {
        let mut session = session(article_page());
        assert_eq!(session.request_summary().await.unwrap(), SummaryOutcome::Ignored);

        let mut disabled =
            ReaderSession::new(article_page(), ReaderConfig::builder().summary_enabled(false).build()).unwrap();
        disabled.activate();
        assert_eq!(disabled.request_summary().await.unwrap(), SummaryOutcome::Ignored);
    }

    #[test]
    fn test_announcement_shown_once() {
        let config = ReaderConfig::builder().version("1.0.4").build();
        let mut session = ReaderSession::new(article_page(), config).unwrap();

        session.activate();
        assert!(session.overlay().unwrap().announcement.is_some());
        assert!(session.dismiss_announcement());
        assert!(!session.dismiss_announcement());

        session.close();
        session.activate();
        assert!(session.overlay().unwrap().announcement.is_none());
    }

    #[test]
    fn test_notice_expiry() {
        let mut session = session(empty_page());
        session.activate();
        let raised = session.notices()[0].raised_at;

        session.expire_notices(raised + Duration::from_secs(1));
        assert_eq!(session.notices().len(), 1);
        session.expire_notices(raised + NOTICE_TTL);
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_tier_recorded() {
        let mut session = session(article_page());
        session.activate();
        assert!(matches!(session.resolution().unwrap().tier, Tier::Readability | Tier::ArticleElement));
    }
}
