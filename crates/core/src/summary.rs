//! Client for the remote summarization service.
//!
//! The service takes `{content, title, author}` as JSON and answers with a
//! `summary` string of `•`-delimited bullets plus optional metadata.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::content::ContentRecord;
use crate::{HushError, Result};

/// Hosted summarization endpoint.
pub const DEFAULT_SUMMARY_ENDPOINT: &str = "https://quickscribe-api.vercel.app/api/summarize";

/// Only this many characters of article text are sent.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 4000;

/// Separates bullets in a summary.
pub const BULLET_DELIMITER: char = '•';

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Body of a summary request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRequest {
    pub content: String,
    pub title: String,
    pub author: String,
}

impl SummaryRequest {
    /// Builds a request from a record, truncating its text to `max_chars`.
    pub fn from_record(record: &ContentRecord, max_chars: usize) -> Self {
        let author = record.byline.trim();
        Self {
            content: record.text.chars().take(max_chars).collect(),
            title: record.title.clone(),
            author: if author.is_empty() { UNKNOWN_AUTHOR.to_string() } else { author.to_string() },
        }
    }
}

/// A summary returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
}

impl SummaryRecord {
    /// Display lines, one per bullet.
    ///
    /// Blank segments are dropped and `**` emphasis markers stripped, so
    /// `"• A. • B. **C**."` gives `["• A.", "• B. C."]`.
    pub fn bullets(&self) -> Vec<String> {
        self.summary
            .split(BULLET_DELIMITER)
            .map(|segment| segment.replace("**", ""))
            .map(|segment| segment.trim().to_string())
            .filter(|segment| !segment.is_empty())
            .map(|segment| format!("{BULLET_DELIMITER} {segment}"))
            .collect()
    }
}

/// Wire shape of a response, before the `summary` check.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    summary: Option<String>,
    title: Option<String>,
    author: Option<String>,
    date_published: Option<String>,
    word_count: Option<u64>,
}

impl TryFrom<SummaryResponse> for SummaryRecord {
    type Error = HushError;

    fn try_from(response: SummaryResponse) -> Result<Self> {
        let summary = response
            .summary
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| HushError::MalformedResponse("no summary field".to_string()))?;

        Ok(Self {
            summary,
            title: response.title,
            author: response.author,
            date_published: response.date_published,
            word_count: response.word_count,
        })
    }
}

/// Summary client configuration.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Endpoint URL receiving the POST
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Characters of article text sent
    pub max_input_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SUMMARY_ENDPOINT.to_string(),
            timeout: 30,
            max_input_chars: MAX_SUMMARY_INPUT_CHARS,
        }
    }
}

/// HTTP client for the summarization service.
#[derive(Debug, Clone)]
pub struct SummaryClient {
    client: Client,
    config: SummaryConfig,
}

impl SummaryClient {
    pub fn new(config: SummaryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(HushError::HttpError)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Sends one summary request for `record`.
    ///
    /// # Errors
    ///
    /// - [`HushError::NetworkError`] when the request cannot be sent or times out
    /// - [`HushError::ApiError`] on a non-2xx status
    /// - [`HushError::MalformedResponse`] when the body is not JSON or has no summary
    pub async fn request_summary(&self, record: &ContentRecord) -> Result<SummaryRecord> {
        let request = SummaryRequest::from_record(record, self.config.max_input_chars);
        tracing::info!(
            endpoint = %self.config.endpoint,
            chars = request.content.chars().count(),
            "requesting summary"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(HushError::NetworkError)?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "summary service responded");
        if !status.is_success() {
            return Err(HushError::ApiError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(HushError::NetworkError)?;
        let parsed: SummaryResponse =
            serde_json::from_str(&body).map_err(|e| HushError::MalformedResponse(e.to_string()))?;

        SummaryRecord::try_from(parsed)
    }
}
