use serde::Deserialize;
use tracing::debug;

use crate::types::{NewsdeckError, RawFeedItem, Result};

/// Canonical permalink prefix; post links are always rebuilt from this, never
/// taken from the post's external `url` field.
const PERMALINK_PREFIX: &str = "https://www.reddit.com";

/// Listing node kind for posts. Comment nodes (`t1`) are excluded.
const POST_KIND: &str = "t3";

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    kind: String,
    data: Post,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    id: String,
    title: String,
    selftext: String,
    selftext_html: Option<String>,
    url: Option<String>,
    permalink: String,
    created_utc: f64,
    link_flair_text: Option<String>,
}

/// Descend into the nested listing, keep post-kind children only, and map
/// them into the raw item shape.
pub fn parse(body: &str) -> Result<Vec<RawFeedItem>> {
    let listing: Listing = serde_json::from_str(body)
        .map_err(|e| NewsdeckError::Parse(format!("invalid listing JSON: {e}")))?;

    let items: Vec<RawFeedItem> = listing
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == POST_KIND)
        .map(|child| map_post(child.data))
        .collect();

    debug!(posts = items.len(), "parsed structured-JSON listing");
    Ok(items)
}

fn map_post(post: Post) -> RawFeedItem {
    let selftext = Some(post.selftext.trim().to_string()).filter(|s| !s.is_empty());

    // Description: self-text when present, otherwise the external link URL.
    let snippet = selftext
        .clone()
        .or_else(|| post.url.clone().filter(|u| !u.is_empty()));

    // Content: rendered self-text HTML when present, otherwise raw self-text.
    let full_content = post
        .selftext_html
        .filter(|html| !html.is_empty())
        .or(selftext);

    RawFeedItem {
        guid: (!post.id.is_empty()).then_some(post.id),
        title: (!post.title.is_empty()).then_some(post.title),
        snippet,
        summary_html: None,
        content_html: None,
        full_content,
        link: Some(format!("{PERMALINK_PREFIX}{}", post.permalink)),
        iso_date: None,
        raw_date: None,
        epoch_secs: (post.created_utc > 0.0).then_some(post.created_utc as i64),
        author: None,
        categories: post.link_flair_text.into_iter().collect(),
    }
}
