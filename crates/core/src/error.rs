//! Error types for Hush operations.
//!
//! This module defines the main error type [`HushError`] which covers
//! content resolution, summary requests, persisted preferences, and page
//! loading.
//!
//! # Example
//!
//! ```rust
//! use hush_core::{HushError, Result};
//!
//! fn require_content(text: &str) -> Result<&str> {
//!     if text.trim().is_empty() {
//!         return Err(HushError::ExtractionFailure);
//!     }
//!     Ok(text)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reader operations.
///
/// Every variant is recoverable: the session turns them into notices and
/// never lets them escape to the host page.
#[derive(Error, Debug)]
pub enum HushError {
    /// No tier of the fallback chain produced acceptable content.
    #[error("No readable content found on this page")]
    ExtractionFailure,

    /// The structured extractor could not find an article.
    ///
    /// Only ever seen by the resolver, which falls through to the next tier.
    #[error("Structured extraction failed: {0}")]
    ExtractorFailed(String),

    /// Transport failure while talking to the summary service.
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// The summary service answered with a non-success status.
    #[error("API request failed: {status} {reason}")]
    ApiError { status: u16, reason: String },

    /// The summary service answered 2xx but without a usable summary.
    #[error("Invalid response from API: {0}")]
    MalformedResponse(String),

    /// Durable key-value storage could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// HTTP errors while fetching a page.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector or unparsable markup.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Theme key outside `light | dark | sepia`.
    #[error("Unknown theme: {0} (expected light, dark or sepia)")]
    InvalidTheme(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HushError {
    /// Message shown to the user in a notice.
    ///
    /// Summary failures are split three ways: network, API, and everything
    /// else.
    pub fn user_message(&self) -> String {
        match self {
            HushError::ExtractionFailure | HushError::ExtractorFailed(_) => {
                "No readable content found on this page.".to_string()
            }
            HushError::NetworkError(_) | HushError::Timeout { .. } => {
                "Network error. Please check your internet connection.".to_string()
            }
            HushError::ApiError { .. } => format!("API error: {}", self),
            HushError::MalformedResponse(_) => "Failed to generate summary. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for HushError.
pub type Result<T> = std::result::Result<T, HushError>;
