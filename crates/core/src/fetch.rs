//! Loading pages for the reader from the network, disk, or stdin.
//!
//! A session normally runs against a page the host already has. These
//! loaders give the CLI and tests the same starting point: markup plus the
//! URL it should be read as, so relative links resolve against the right
//! base.

use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use url::Url;

use crate::page::Page;
use crate::{HushError, Result};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// HTTP settings for page loads.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: format!("Mozilla/5.0 (compatible; Hush/{})", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// Markup loaded over HTTP together with where it ended up.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// URL after redirects; relative links on the page resolve against it.
    pub final_url: Url,
    pub content_type: Option<String>,
}

impl FetchedPage {
    pub fn into_page(self) -> Result<Page> {
        Page::from_url(&self.html, self.final_url)
    }
}

/// Loads a page over `http` or `https`, following redirects.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<FetchedPage> {
    let requested = Url::parse(url).map_err(|e| HushError::InvalidUrl(e.to_string()))?;
    if !matches!(requested.scheme(), "http" | "https") {
        return Err(HushError::InvalidUrl(format!(
            "unsupported scheme '{}' (expected http or https)",
            requested.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()?;

    tracing::debug!(url = %requested, "loading page");
    let response = client
        .get(requested.clone())
        .header(USER_AGENT, &config.user_agent)
        .header(ACCEPT, ACCEPT_HTML)
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| match e.is_timeout() {
            true => HushError::Timeout { timeout: config.timeout },
            false => HushError::HttpError(e),
        })?
        .error_for_status()?;

    let final_url = response.url().clone();
    if final_url != requested {
        tracing::info!(from = %requested, to = %final_url, "page redirected");
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let html = response.text().await?;
    Ok(FetchedPage { html, final_url, content_type })
}

/// Reads a saved page from disk.
pub fn fetch_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HushError::FileNotFound(path.to_path_buf()),
        _ => HushError::Io(e),
    })
}

/// Reads markup piped on stdin until EOF.
pub fn fetch_stdin() -> Result<String> {
    let mut html = String::new();
    io::stdin().read_to_string(&mut html)?;
    Ok(html)
}
