mod reddit;
mod syndication;

use crate::types::{RawFeedItem, Result, SourceKind};

/// Parse a fetched body into raw items using the strategy resolved for the
/// source at configuration time. A failure here is recovered by the
/// aggregator and treated as zero items from the source.
pub fn parse_items(kind: SourceKind, body: &str) -> Result<Vec<RawFeedItem>> {
    match kind {
        SourceKind::Syndication => syndication::parse(body),
        SourceKind::StructuredJson => reddit::parse(body),
    }
}
