use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::debug;

use crate::types::{NewsdeckError, RawFeedItem, Result};

/// RSS/Atom parsing, delegated to feed-rs. Extension fields are already
/// folded in by the parser: `content:encoded` lands in the entry content and
/// `dc:creator` in the author list.
pub fn parse(body: &str) -> Result<Vec<RawFeedItem>> {
    let feed = parser::parse(body.as_bytes())
        .map_err(|e| NewsdeckError::Parse(format!("failed to parse feed: {e}")))?;

    debug!(entries = feed.entries.len(), "parsed syndication feed");
    Ok(feed.entries.into_iter().map(map_entry).collect())
}

fn map_entry(entry: Entry) -> RawFeedItem {
    let author = entry
        .authors
        .first()
        .map(|a| a.name.clone())
        .filter(|name| !name.is_empty());

    RawFeedItem {
        guid: (!entry.id.is_empty()).then(|| entry.id.clone()),
        title: entry.title.map(|t| t.content),
        snippet: None,
        summary_html: entry.summary.map(|t| t.content),
        content_html: None,
        full_content: entry.content.and_then(|c| c.body),
        link: entry.links.first().map(|l| l.href.clone()),
        iso_date: entry.published.or(entry.updated),
        raw_date: None,
        epoch_secs: None,
        author,
        categories: entry
            .categories
            .into_iter()
            .map(|c| c.label.unwrap_or(c.term))
            .collect(),
    }
}
