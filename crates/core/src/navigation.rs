//! Detection of in-page navigation.

use url::Url;

/// Reports when the page URL changes without a full reload.
pub trait NavigationWatcher {
    /// Records `url` and returns `true` if it differs from the previous one.
    fn observe(&mut self, url: &Url) -> bool;
}

/// Compares each observed URL with the last one.
#[derive(Debug, Clone, Default)]
pub struct UrlPoller {
    current: Option<Url>,
}

impl UrlPoller {
    pub fn new(initial: Url) -> Self {
        Self { current: Some(initial) }
    }

    pub fn current(&self) -> Option<&Url> {
        self.current.as_ref()
    }
}

impl NavigationWatcher for UrlPoller {
    fn observe(&mut self, url: &Url) -> bool {
        if self.current.as_ref() == Some(url) {
            return false;
        }
        let changed = self.current.is_some();
        self.current = Some(url.clone());
        changed
    }
}
