//! Reader themes and their persisted preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::Storage;
use crate::{HushError, Result};

/// Storage key of the theme preference.
pub const THEME_STORAGE_KEY: &str = "reader_theme";

/// Presentation mode of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    /// Themes in the order the picker lists them.
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Sepia];

    pub fn key(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Sepia => "Sepia",
        }
    }

    /// Picker icon, relative to the asset base.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "light.svg",
            Theme::Dark => "dark.svg",
            Theme::Sepia => "sepia.svg",
        }
    }

    /// Navbar logo, relative to the asset base.
    pub fn logo(self) -> &'static str {
        match self {
            Theme::Dark => "logodark.png",
            Theme::Light | Theme::Sepia => "logo.png",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Theme {
    type Err = HushError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "sepia" => Ok(Theme::Sepia),
            _ => Err(HushError::InvalidTheme(s.to_string())),
        }
    }
}

/// The host's `prefers-color-scheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemPreference {
    #[default]
    NoPreference,
    Light,
    Dark,
}

/// Tracks the applied theme and keeps the stored preference in sync.
///
/// Storage errors never reach the caller. When a write fails the selection
/// is remembered here instead and wins over storage until the process ends.
#[derive(Debug, Clone, Default)]
pub struct ThemeManager {
    current: Theme,
    unsaved: Option<Theme>,
}

impl ThemeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the theme for a newly opened overlay and applies it.
    ///
    /// Priority: explicit user choice, then a dark system preference, then
    /// light. Unknown stored values are ignored.
    pub fn resolve(&mut self, storage: &dyn Storage, system: SystemPreference) -> Theme {
        let theme = self
            .unsaved
            .or_else(|| self.stored(storage))
            .unwrap_or(match system {
                SystemPreference::Dark => Theme::Dark,
                SystemPreference::Light | SystemPreference::NoPreference => Theme::Light,
            });
        self.apply(theme);
        theme
    }

    pub fn apply(&mut self, theme: Theme) {
        self.current = theme;
    }

    /// Writes `theme` as the user's explicit choice.
    pub fn persist(&mut self, storage: &mut dyn Storage, theme: Theme) {
        match storage.set(THEME_STORAGE_KEY, theme.key()) {
            Ok(()) => self.unsaved = None,
            Err(e) => {
                tracing::warn!(error = %e, %theme, "could not persist theme, keeping it in memory");
                self.unsaved = Some(theme);
            }
        }
    }

    /// Applies and persists in one step, as the picker does.
    pub fn select(&mut self, storage: &mut dyn Storage, theme: Theme) {
        self.apply(theme);
        self.persist(storage, theme);
    }

    /// Forgets the explicit choice so the system preference applies again.
    pub fn clear(&mut self, storage: &mut dyn Storage) {
        self.unsaved = None;
        if let Err(e) = storage.remove(THEME_STORAGE_KEY) {
            tracing::warn!(error = %e, "could not clear stored theme");
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// The persisted choice, if readable and valid.
    pub fn stored(&self, storage: &dyn Storage) -> Option<Theme> {
        match storage.get(THEME_STORAGE_KEY) {
            Ok(Some(value)) => value
                .parse()
                .inspect_err(|e| tracing::debug!(error = %e, "ignoring stored theme"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored theme");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use rstest::rstest;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(HushError::StorageUnavailable("broken".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(HushError::StorageUnavailable("broken".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(HushError::StorageUnavailable("broken".to_string()))
        }
    }

    #[rstest]
    #[case("light", Theme::Light)]
    #[case("Dark", Theme::Dark)]
    #[case(" sepia ", Theme::Sepia)]
    fn test_parse_theme(#[case] input: &str, #[case] expected: Theme) {
        assert_eq!(input.parse::<Theme>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_theme() {
        assert!(matches!("solarized".parse::<Theme>(), Err(HushError::InvalidTheme(_))));
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        assert_eq!(serde_json::to_string(&Theme::Sepia).unwrap(), "\"sepia\"");
    }

    #[test]
    fn test_logo_follows_theme() {
        assert_eq!(Theme::Dark.logo(), "logodark.png");
        assert_eq!(Theme::Sepia.logo(), "logo.png");
    }

    #[rstest]
    #[case(SystemPreference::Dark, Theme::Dark)]
    #[case(SystemPreference::Light, Theme::Light)]
    #[case(SystemPreference::NoPreference, Theme::Light)]
    fn test_resolve_without_stored_choice(#[case] system: SystemPreference, #[case] expected: Theme) {
        let mut manager = ThemeManager::new();
        assert_eq!(manager.resolve(&MemoryStorage::new(), system), expected);
        assert_eq!(manager.current(), expected);
    }

    #[test]
    fn test_stored_choice_overrides_system() {
        let mut storage = MemoryStorage::new();
        ThemeManager::new().select(&mut storage, Theme::Sepia);

        let mut fresh = ThemeManager::new();
        assert_eq!(fresh.resolve(&storage, SystemPreference::Dark), Theme::Sepia);
    }

    #[test]
    fn test_invalid_stored_value_falls_through() {
        let mut storage = MemoryStorage::new();
        storage.set(THEME_STORAGE_KEY, "neon").unwrap();

        let mut manager = ThemeManager::new();
        assert_eq!(manager.resolve(&storage, SystemPreference::Dark), Theme::Dark);
    }

    #[test]
    fn test_clear_restores_system_preference() {
        let mut storage = MemoryStorage::new();
        let mut manager = ThemeManager::new();
        manager.select(&mut storage, Theme::Sepia);
        manager.clear(&mut storage);

        assert_eq!(manager.resolve(&storage, SystemPreference::Dark), Theme::Dark);
    }

    #[test]
    fn test_broken_storage_keeps_choice_in_memory() {
        let mut storage = BrokenStorage;
        let mut manager = ThemeManager::new();

        assert_eq!(manager.resolve(&storage, SystemPreference::NoPreference), Theme::Light);
        manager.select(&mut storage, Theme::Sepia);
        assert_eq!(manager.current(), Theme::Sepia);
        assert_eq!(manager.resolve(&storage, SystemPreference::Dark), Theme::Sepia);
    }
}
