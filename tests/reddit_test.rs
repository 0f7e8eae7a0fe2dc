use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use newsdeck::{Aggregator, AggregatorConfig, FeedSource, FetchError, HttpTransport};

struct CannedTransport {
    bodies: HashMap<String, String>,
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

const LISTING: &str = r#"{
  "kind": "Listing",
  "data": {
    "children": [
      {
        "kind": "t3",
        "data": {
          "id": "post1",
          "title": "Ask r/technology: best RSS reader?",
          "selftext": "Looking for recommendations.",
          "selftext_html": "&lt;div&gt;Looking for recommendations.&lt;/div&gt;",
          "url": "https://www.reddit.com/r/technology/comments/post1/best_rss_reader/",
          "permalink": "/r/technology/comments/post1/best_rss_reader/",
          "created_utc": 1717240000,
          "link_flair_text": "Question"
        }
      },
      {
        "kind": "t1",
        "data": {
          "id": "reply1",
          "selftext": "I like newsboat.",
          "permalink": "/r/technology/comments/post1/best_rss_reader/reply1/",
          "created_utc": 1717240100
        }
      },
      {
        "kind": "t3",
        "data": {
          "id": "post2",
          "title": "Vendor ships new chip",
          "selftext": "",
          "url": "https://chips.example.com/announcement",
          "permalink": "/r/technology/comments/post2/vendor_ships_new_chip/",
          "created_utc": 1717230000
        }
      }
    ]
  }
}"#;

fn reddit_source() -> FeedSource {
    FeedSource::new(
        "r-technology",
        "r/technology",
        "https://www.reddit.com/r/technology",
        vec!["tech".to_string()],
    )
}

fn aggregator_with_listing() -> Aggregator {
    let mut bodies = HashMap::new();
    // The fetcher requests the listing endpoint, not the page URL.
    bodies.insert(
        "https://www.reddit.com/r/technology.json".to_string(),
        LISTING.to_string(),
    );
    Aggregator::with_transport(
        &AggregatorConfig::default(),
        Arc::new(CannedTransport { bodies }),
    )
}

#[tokio::test]
async fn listing_yields_one_article_per_post() {
    let _ = tracing_subscriber::fmt().try_init();

    let articles = aggregator_with_listing()
        .fetch_all(&[reddit_source()], 20)
        .await;

    // Two t3 posts; the t1 comment never becomes an article.
    assert_eq!(articles.len(), 2);
    assert!(articles.iter().all(|a| a.source_name == "r/technology"));
}

#[tokio::test]
async fn post_links_point_at_the_discussion() {
    let articles = aggregator_with_listing()
        .fetch_all(&[reddit_source()], 20)
        .await;

    let links: Vec<&str> = articles.iter().map(|a| a.link.as_str()).collect();
    assert!(links
        .contains(&"https://www.reddit.com/r/technology/comments/post1/best_rss_reader/"));
    assert!(links
        .contains(&"https://www.reddit.com/r/technology/comments/post2/vendor_ships_new_chip/"));
}

#[tokio::test]
async fn self_and_link_posts_map_their_descriptions() {
    let articles = aggregator_with_listing()
        .fetch_all(&[reddit_source()], 20)
        .await;

    let self_post = articles
        .iter()
        .find(|a| a.title.starts_with("Ask r/technology"))
        .unwrap();
    assert_eq!(self_post.description, "Looking for recommendations.");
    assert_eq!(self_post.content, "Looking for recommendations.");
    // Item flair first, then the source-level tag.
    assert_eq!(self_post.categories, vec!["Question", "tech"]);

    let link_post = articles
        .iter()
        .find(|a| a.title == "Vendor ships new chip")
        .unwrap();
    assert_eq!(link_post.description, "https://chips.example.com/announcement");
}

#[tokio::test]
async fn creation_epoch_becomes_published_at() {
    let articles = aggregator_with_listing()
        .fetch_all(&[reddit_source()], 20)
        .await;

    let newest = &articles[0];
    assert_eq!(
        newest.published_at,
        Utc.timestamp_opt(1_717_240_000, 0).single().unwrap()
    );
    // Newest-first within the merged list.
    assert!(articles[0].published_at > articles[1].published_at);
}
