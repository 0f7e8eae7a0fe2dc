use chrono::{DateTime, Utc};

use crate::types::Article;

/// View-level source/date predicate over an aggregated article set. This is
/// an interface contract for the presentation layer, not part of the
/// ingestion core.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    /// Source display names to include. Empty means all sources.
    pub sources: Vec<String>,
    /// Lower bound on publication time, inclusive.
    pub since: Option<DateTime<Utc>>,
}

impl FeedFilter {
    pub fn matches(&self, article: &Article) -> bool {
        if !self.sources.is_empty() && !self.sources.iter().any(|s| s == &article.source_name) {
            return false;
        }
        if let Some(since) = self.since {
            if article.published_at < since {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, articles: &[Article]) -> Vec<Article> {
        articles
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }
}
