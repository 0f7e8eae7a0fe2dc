use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::fetcher::{Fetcher, HttpTransport};
use crate::normalize::normalize;
use crate::parser;
use crate::types::{AggregatorConfig, Article, FeedSource};

/// Fans fetches out across sources with bounded concurrency, absorbs
/// per-source failures, and merges the results into one globally sorted,
/// capped article list.
pub struct Aggregator {
    fetcher: Fetcher,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(config: &AggregatorConfig) -> Self {
        Self {
            fetcher: Fetcher::new(config),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Same aggregator, but with an injected transport. Used by tests to
    /// serve canned bodies and observe concurrency.
    pub fn with_transport(config: &AggregatorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            fetcher: Fetcher::with_transport(transport, config.relay_base.clone()),
            concurrency: config.concurrency.max(1),
        }
    }

    /// The sole aggregation entry point. Never fails: a source that cannot be
    /// fetched or parsed contributes zero items, and the caller always gets a
    /// list (possibly shorter than requested, possibly empty).
    pub async fn fetch_all(&self, sources: &[FeedSource], total_limit: usize) -> Vec<Article> {
        if sources.is_empty() || total_limit == 0 {
            return Vec::new();
        }

        // Split the cap evenly so truncation favors freshness across
        // sources instead of whichever source returned the most items.
        let per_source_cap = total_limit.div_ceil(sources.len());

        let mut articles: Vec<Article> = stream::iter(sources)
            .map(|source| self.fetch_source(source, per_source_cap))
            .buffer_unordered(self.concurrency)
            .collect::<Vec<Vec<Article>>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        sort_newest_first(&mut articles);
        articles.truncate(total_limit);

        debug!(total = articles.len(), limit = total_limit, "aggregation pass complete");
        articles
    }

    /// One isolated per-source pass: fetch, parse, normalize, order, cap.
    /// Every failure collapses to an empty list here and never propagates.
    async fn fetch_source(&self, source: &FeedSource, cap: usize) -> Vec<Article> {
        let body = match self.fetcher.fetch_source(source).await {
            Ok(body) => body,
            Err(e) => {
                warn!(source = %source.id, error = %e, "fetch failed, skipping source");
                return Vec::new();
            }
        };

        let raw_items = match parser::parse_items(source.kind, &body) {
            Ok(items) => items,
            Err(e) => {
                warn!(source = %source.id, error = %e, "parse failed, skipping source");
                return Vec::new();
            }
        };

        let fetched_at = Utc::now();
        let mut articles: Vec<Article> = raw_items
            .iter()
            .enumerate()
            .map(|(seq, raw)| normalize(raw, source, fetched_at, seq))
            .collect();

        sort_newest_first(&mut articles);
        articles.truncate(cap);

        debug!(source = %source.id, count = articles.len(), "source yielded articles");
        articles
    }
}

/// Deterministic ordering: publication time descending, then source name and
/// id so equal timestamps sort reproducibly regardless of completion order.
fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.source_name.cmp(&b.source_name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Convenience entry point matching the presentation layer's contract: a
/// default-configured aggregation pass over the given sources.
pub async fn fetch_all_feeds(sources: &[FeedSource], total_limit: usize) -> Vec<Article> {
    Aggregator::new(&AggregatorConfig::default())
        .fetch_all(sources, total_limit)
        .await
}
