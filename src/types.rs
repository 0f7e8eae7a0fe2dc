use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a source's payload is shaped, resolved once from the URL at
/// configuration time and never re-derived per fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// RSS or Atom XML, handled by a standards-aware feed parser.
    Syndication,
    /// Reddit-style nested JSON listing.
    StructuredJson,
}

impl SourceKind {
    pub fn from_url(url: &str) -> Self {
        if url.contains("reddit.com") {
            SourceKind::StructuredJson
        } else {
            SourceKind::Syndication
        }
    }
}

/// Immutable feed source descriptor. Created at process start from static
/// configuration; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub id: String,
    pub name: String,
    pub url: String,
    pub categories: Vec<String>,
    pub kind: SourceKind,
}

impl FeedSource {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        categories: Vec<String>,
    ) -> Self {
        let url = url.into();
        let kind = SourceKind::from_url(&url);
        Self {
            id: id.into(),
            name: name.into(),
            url,
            categories,
            kind,
        }
    }
}

/// Format-neutral intermediate produced by the parsers and consumed by the
/// normalizer within a single parse call. Not retained.
#[derive(Debug, Clone, Default)]
pub struct RawFeedItem {
    pub guid: Option<String>,
    pub title: Option<String>,
    /// Parser-provided plain-text snippet, already free of markup.
    pub snippet: Option<String>,
    /// Markup-bearing summary field (RSS description, Atom summary).
    pub summary_html: Option<String>,
    /// Standard content field.
    pub content_html: Option<String>,
    /// Full-content extension field (content:encoded and friends).
    pub full_content: Option<String>,
    pub link: Option<String>,
    /// ISO-normalized timestamp, when the parser could produce one.
    pub iso_date: Option<DateTime<Utc>>,
    /// Raw date string as it appeared in the feed.
    pub raw_date: Option<String>,
    /// UTC creation epoch in seconds (structured-JSON listings).
    pub epoch_secs: Option<i64>,
    pub author: Option<String>,
    pub categories: Vec<String>,
}

/// Canonical, format-independent representation of one feed entry. The unit
/// exchanged with the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub source_name: String,
    pub source_url: String,
    pub categories: Vec<String>,
    pub author: Option<String>,
}

/// Explicitly constructed aggregation settings, passed down through the
/// transport and aggregator instead of living in module-level state.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Hard bound on each outbound fetch; exceeding it cancels the request.
    pub timeout: Duration,
    /// Maximum simultaneous in-flight fetches.
    pub concurrency: usize,
    /// Base URL of the same-origin relay. `None` fetches feeds directly.
    pub relay_base: Option<String>,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            concurrency: 5,
            relay_base: None,
            user_agent: "Mozilla/5.0 (compatible; newsdeck/0.1; +https://github.com/newsdeck)"
                .to_string(),
            max_redirects: 5,
        }
    }
}

/// Transport-level failure, recovered inside the per-source fetch and never
/// surfaced past the aggregator boundary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NewsdeckError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("completion backend error: {0}")]
    Completion(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NewsdeckError>;
