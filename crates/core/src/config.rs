//! Reader session configuration.

use std::time::Duration;

use crate::content::MIN_CONTENT_LENGTH;
use crate::summary::{DEFAULT_SUMMARY_ENDPOINT, MAX_SUMMARY_INPUT_CHARS, SummaryConfig};

/// Configuration for a [`ReaderSession`](crate::ReaderSession).
///
/// # Example
///
/// ```rust
/// use hush_core::ReaderConfig;
///
/// let config = ReaderConfig::builder()
///     .summary_enabled(false)
///     .reveal_delay_ms(0)
///     .build();
/// assert!(!config.summary_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Candidates need strictly more characters than this (default: 100).
    pub min_content_length: usize,

    /// Summary service endpoint.
    pub summary_endpoint: String,

    /// Characters of article text sent for summarization (default: 4000).
    pub summary_max_chars: usize,

    /// Summary request timeout in seconds (default: 30).
    pub summary_timeout: u64,

    /// Whether the navbar offers a summary button (default: true).
    pub summary_enabled: bool,

    /// Delay between mounting the shell and showing content (default: 1000 ms).
    pub reveal_delay_ms: u64,

    /// Delay before the body's entrance transition starts (default: 10 ms).
    pub entrance_delay_ms: u64,

    /// Prefix for logo and icon URLs (default: `assets/`).
    pub asset_base: String,

    /// Target of the feedback control.
    pub feedback_url: String,

    /// Target of the about control.
    pub about_url: String,

    /// Release version, used for announcements.
    pub version: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            min_content_length: MIN_CONTENT_LENGTH,
            summary_endpoint: DEFAULT_SUMMARY_ENDPOINT.to_string(),
            summary_max_chars: MAX_SUMMARY_INPUT_CHARS,
            summary_timeout: 30,
            summary_enabled: true,
            reveal_delay_ms: 1000,
            entrance_delay_ms: 10,
            asset_base: "assets/".to_string(),
            feedback_url: "mailto:?subject=Hush%20feedback".to_string(),
            about_url: "about.html".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ReaderConfig {
    /// Creates a new builder for ReaderConfig.
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn entrance_delay(&self) -> Duration {
        Duration::from_millis(self.entrance_delay_ms)
    }

    /// Settings for the summary client.
    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            endpoint: self.summary_endpoint.clone(),
            timeout: self.summary_timeout,
            max_input_chars: self.summary_max_chars,
        }
    }

    /// URL of an asset under `asset_base`.
    pub fn asset(&self, name: &str) -> String {
        format!("{}{}", self.asset_base, name)
    }
}

/// Builder for ReaderConfig.
///
/// # Example
///
/// ```rust
/// use hush_core::ReaderConfig;
///
/// let config = ReaderConfig::builder()
///     .summary_endpoint("http://localhost:8080/summarize")
///     .summary_timeout(5)
///     .build();
/// assert_eq!(config.summary_timeout, 5);
/// ```
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ReaderConfig::default() }
    }

    pub fn min_content_length(mut self, value: usize) -> Self {
        self.config.min_content_length = value;
        self
    }

    pub fn summary_endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.summary_endpoint = value.into();
        self
    }

    pub fn summary_max_chars(mut self, value: usize) -> Self {
        self.config.summary_max_chars = value;
        self
    }

    pub fn summary_timeout(mut self, value: u64) -> Self {
        self.config.summary_timeout = value;
        self
    }

    pub fn summary_enabled(mut self, value: bool) -> Self {
        self.config.summary_enabled = value;
        self
    }

    pub fn reveal_delay_ms(mut self, value: u64) -> Self {
        self.config.reveal_delay_ms = value;
        self
    }

    pub fn entrance_delay_ms(mut self, value: u64) -> Self {
        self.config.entrance_delay_ms = value;
        self
    }

    pub fn asset_base(mut self, value: impl Into<String>) -> Self {
        self.config.asset_base = value.into();
        self
    }

    pub fn feedback_url(mut self, value: impl Into<String>) -> Self {
        self.config.feedback_url = value.into();
        self
    }

    pub fn about_url(mut self, value: impl Into<String>) -> Self {
        self.config.about_url = value.into();
        self
    }

    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.config.version = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ReaderConfig {
        self.config
    }
}

impl Default for ReaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.min_content_length, 100);
        assert_eq!(config.summary_max_chars, 4000);
        assert!(config.summary_enabled);
        assert_eq!(config.reveal_delay(), Duration::from_millis(1000));
        assert_eq!(config.entrance_delay(), Duration::from_millis(10));
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ReaderConfig::builder()
            .summary_endpoint("http://127.0.0.1:9/summarize")
            .summary_max_chars(10)
            .asset_base("/static/")
            .version("1.0.4")
            .build();

        assert_eq!(config.asset("logo.png"), "/static/logo.png");
        let summary = config.summary_config();
        assert_eq!(summary.endpoint, "http://127.0.0.1:9/summarize");
        assert_eq!(summary.max_input_chars, 10);
    }
}
