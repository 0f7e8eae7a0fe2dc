//! HTML cleanup for markup-bearing feed fields: CDATA unwrapping, tag
//! stripping, entity decoding, and removal of per-source boilerplate trailers.

use once_cell::sync::Lazy;
use regex::Regex;

static CDATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static NAMED_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?([a-z][a-z0-9]*)\b[^>]*>").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Trailer strings some feeds append to every item body.
static TRAILER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"Continue reading on Medium »\s*$").unwrap(),
        Regex::new(r"(?i)©\s*\d{4}[^<]*?all rights reserved\.?[^<]*$").unwrap(),
    ]
});

/// Unwrap `<![CDATA[...]]>` sections, leaving their payload in place.
pub fn unwrap_cdata(input: &str) -> String {
    CDATA_RE.replace_all(input, "$1").into_owned()
}

/// Reduce markup to plain text: CDATA unwrapped, every tag removed, entities
/// decoded, whitespace collapsed. Used when deriving the description field.
pub fn strip_all_tags(input: &str) -> String {
    let unwrapped = unwrap_cdata(input);
    let without_boilerplate = strip_boilerplate(&unwrapped);
    let without_tags = TAG_RE.replace_all(&without_boilerplate, " ");
    let decoded = html_escape::decode_html_entities(without_tags.as_ref()).into_owned();
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Clean a full-fidelity body while keeping a minimal inline allow-list
/// (paragraphs and anchors) for display. Entities are decoded before tag
/// stripping so entity-encoded bodies (Reddit's `selftext_html`) clean the
/// same way as literal markup.
pub fn clean_html(input: &str) -> String {
    let unwrapped = unwrap_cdata(input);
    let without_boilerplate = strip_boilerplate(&unwrapped);
    let decoded = html_escape::decode_html_entities(&without_boilerplate).into_owned();
    NAMED_TAG_RE
        .replace_all(&decoded, |caps: &regex::Captures| {
            let name = caps[1].to_ascii_lowercase();
            if name == "p" || name == "a" {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .trim()
        .to_string()
}

fn strip_boilerplate(input: &str) -> String {
    let mut out = input.trim_end().to_string();
    for re in TRAILER_RES.iter() {
        out = re.replace(&out, "").trim_end().to_string();
    }
    out
}

/// Character-bounded truncation with an ellipsis suffix when anything was cut.
pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdata_wrapped_description_reduces_to_plain_text() {
        let cleaned = strip_all_tags("<![CDATA[<p>Hello <b>World</b></p>]]>");
        assert_eq!(cleaned, "Hello World");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(strip_all_tags("Ben &amp; Jerry&#39;s"), "Ben & Jerry's");
    }

    #[test]
    fn clean_html_keeps_only_paragraphs_and_anchors() {
        let cleaned = clean_html("<div><p>Hi <a href=\"x\">there</a> <script>bad()</script><b>!</b></p></div>");
        assert_eq!(cleaned, "<p>Hi <a href=\"x\">there</a> bad()!</p>");
    }

    #[test]
    fn entity_encoded_body_cleans_like_literal_markup() {
        let cleaned = clean_html("&lt;div&gt;Looking for advice.&lt;/div&gt;");
        assert_eq!(cleaned, "Looking for advice.");
    }

    #[test]
    fn medium_trailer_is_removed() {
        let cleaned = strip_all_tags("<p>Some thoughts.</p>Continue reading on Medium »");
        assert_eq!(cleaned, "Some thoughts.");
    }

    #[test]
    fn copyright_trailer_is_removed() {
        let cleaned =
            strip_all_tags("Big launch day. © 2024 TechCrunch. All rights reserved. For personal use only.");
        assert_eq!(cleaned, "Big launch day.");
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_cut() {
        assert_eq!(truncate_with_ellipsis("short", 300), "short");
        let long = "a".repeat(400);
        let truncated = truncate_with_ellipsis(&long, 300);
        assert_eq!(truncated.chars().count(), 301);
        assert!(truncated.ends_with('…'));
    }
}
