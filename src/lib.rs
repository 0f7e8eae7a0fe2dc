//! newsdeck — personal news aggregation core.
//!
//! Pulls items from RSS/Atom and Reddit-style JSON sources, normalizes them
//! into one canonical article model, and merges them into a single
//! chronologically sorted list under bounded concurrency and per-fetch
//! timeouts. A same-origin relay endpoint and thin AI enrichment actions
//! round out the dashboard's backend.

pub mod aggregator;
pub mod clean;
pub mod enrich;
pub mod fetcher;
pub mod filter;
pub mod normalize;
pub mod parser;
pub mod relay;
pub mod sources;
pub mod types;

pub use aggregator::{fetch_all_feeds, Aggregator};
pub use enrich::{CompletionBackend, Enricher, MockBackend, OpenAiBackend, TechEvent};
pub use fetcher::{Fetcher, HttpTransport, ReqwestTransport};
pub use filter::FeedFilter;
pub use sources::builtin_sources;
pub use types::{
    AggregatorConfig, Article, FeedSource, FetchError, NewsdeckError, RawFeedItem, Result,
    SourceKind,
};
