use chrono::{DateTime, TimeZone, Utc};

use crate::clean;
use crate::types::{Article, FeedSource, RawFeedItem};

/// Upper bound on a description derived by stripping markup from the body.
pub const DESCRIPTION_MAX_CHARS: usize = 300;

/// Map one raw parsed item into the canonical Article. Pure: the same inputs
/// (including `fetched_at` and `seq`) always produce the same Article. `seq`
/// is the item's position within its parse batch; it keeps synthesized ids
/// unique when several items in one fetch carry neither guid nor link.
pub fn normalize(
    raw: &RawFeedItem,
    source: &FeedSource,
    fetched_at: DateTime<Utc>,
    seq: usize,
) -> Article {
    let id = first_non_empty(&raw.guid)
        .or_else(|| first_non_empty(&raw.link))
        .unwrap_or_else(|| format!("{}-{}-{seq}", source.id, fetched_at.timestamp_millis()));

    let title = first_non_empty(&raw.title).unwrap_or_else(|| "Untitled".to_string());

    // Body priority: full-content extension, then content, then summary.
    let body = first_non_empty(&raw.full_content)
        .or_else(|| first_non_empty(&raw.content_html))
        .or_else(|| first_non_empty(&raw.summary_html))
        .unwrap_or_default();
    let content = clean::clean_html(&body);

    let description = first_non_empty(&raw.snippet)
        .map(|s| s.trim().to_string())
        .or_else(|| first_non_empty(&raw.summary_html).map(|s| clean::strip_all_tags(&s)))
        .unwrap_or_else(|| {
            clean::truncate_with_ellipsis(&clean::strip_all_tags(&body), DESCRIPTION_MAX_CHARS)
        });

    let published_at = raw
        .iso_date
        .or_else(|| raw.raw_date.as_deref().and_then(parse_date))
        .or_else(|| raw.epoch_secs.and_then(|secs| Utc.timestamp_opt(secs, 0).single()))
        .unwrap_or(fetched_at);

    Article {
        id,
        title,
        description,
        content,
        link: raw.link.clone().unwrap_or_default(),
        published_at,
        source_name: source.name.clone(),
        source_url: source.url.clone(),
        categories: merge_categories(&raw.categories, &source.categories),
        author: first_non_empty(&raw.author),
    }
}

fn first_non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Union of item-level and source-level tags: comma-joined entries split,
/// each independently cleaned, duplicates dropped keeping first occurrence.
fn merge_categories(item: &[String], source: &[String]) -> Vec<String> {
    let mut merged = Vec::new();
    for entry in item.iter().chain(source.iter()) {
        for part in entry.split(',') {
            let cleaned = clean::strip_all_tags(part);
            if !cleaned.is_empty() && !merged.contains(&cleaned) {
                merged.push(cleaned);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> FeedSource {
        FeedSource::new(
            "tc",
            "TechCrunch",
            "https://techcrunch.com/feed/",
            vec!["Tech News".to_string()],
        )
    }

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn id_prefers_guid_then_link_then_synthesized() {
        let mut raw = RawFeedItem {
            guid: Some("guid-1".to_string()),
            link: Some("https://example.com/a".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &source(), fetched_at(), 0).id, "guid-1");

        raw.guid = None;
        assert_eq!(
            normalize(&raw, &source(), fetched_at(), 0).id,
            "https://example.com/a"
        );

        raw.link = None;
        let synthesized = normalize(&raw, &source(), fetched_at(), 0).id;
        assert!(synthesized.starts_with("tc-"));
    }

    #[test]
    fn guidless_linkless_items_in_one_batch_get_distinct_ids() {
        let first_item = RawFeedItem {
            title: Some("First".to_string()),
            ..Default::default()
        };
        let second_item = RawFeedItem {
            title: Some("Second".to_string()),
            ..Default::default()
        };
        let first = normalize(&first_item, &source(), fetched_at(), 0);
        let second = normalize(&second_item, &source(), fetched_at(), 1);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn missing_title_gets_placeholder() {
        let raw = RawFeedItem::default();
        assert_eq!(normalize(&raw, &source(), fetched_at(), 0).title, "Untitled");
    }

    #[test]
    fn description_falls_back_to_stripped_truncated_content() {
        let raw = RawFeedItem {
            full_content: Some(format!("<p>{}</p>", "word ".repeat(100))),
            ..Default::default()
        };
        let article = normalize(&raw, &source(), fetched_at(), 0);
        assert!(article.description.chars().count() <= DESCRIPTION_MAX_CHARS + 1);
        assert!(article.description.ends_with('…'));
        assert!(!article.description.contains('<'));
    }

    #[test]
    fn description_prefers_snippet_over_summary() {
        let raw = RawFeedItem {
            snippet: Some("plain snippet".to_string()),
            summary_html: Some("<p>html summary</p>".to_string()),
            ..Default::default()
        };
        assert_eq!(
            normalize(&raw, &source(), fetched_at(), 0).description,
            "plain snippet"
        );
    }

    #[test]
    fn unparseable_date_falls_back_to_fetch_time() {
        let raw = RawFeedItem {
            raw_date: Some("not a date".to_string()),
            ..Default::default()
        };
        assert_eq!(
            normalize(&raw, &source(), fetched_at(), 0).published_at,
            fetched_at()
        );
    }

    #[test]
    fn rfc2822_date_is_parsed() {
        let raw = RawFeedItem {
            raw_date: Some("Sat, 01 Jun 2024 08:30:00 +0000".to_string()),
            ..Default::default()
        };
        let article = normalize(&raw, &source(), fetched_at(), 0);
        assert_eq!(
            article.published_at,
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn categories_are_split_cleaned_and_deduplicated() {
        let raw = RawFeedItem {
            categories: vec!["AI, Tech News".to_string(), "AI".to_string()],
            ..Default::default()
        };
        let article = normalize(&raw, &source(), fetched_at(), 0);
        assert_eq!(article.categories, vec!["AI", "Tech News"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = RawFeedItem {
            guid: Some("g".to_string()),
            title: Some("Title".to_string()),
            summary_html: Some("<![CDATA[<p>Summary</p>]]>".to_string()),
            raw_date: Some("Sat, 01 Jun 2024 08:30:00 +0000".to_string()),
            ..Default::default()
        };
        let first = normalize(&raw, &source(), fetched_at(), 0);
        let second = normalize(&raw, &source(), fetched_at(), 0);
        assert_eq!(first, second);
    }
}
