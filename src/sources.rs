use crate::types::FeedSource;

/// Built-in feed registry. The dashboard ships with a static set of sources;
/// callers can pass their own list to the aggregator instead.
pub fn builtin_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "techcrunch",
            "TechCrunch",
            "https://techcrunch.com/feed/",
            tags(&["Tech News", "Startups", "Venture Capital"]),
        ),
        FeedSource::new(
            "verge",
            "The Verge",
            "https://www.theverge.com/rss/index.xml",
            tags(&["Tech News", "Consumer Tech", "Digital Culture"]),
        ),
        FeedSource::new(
            "hn",
            "Hacker News",
            "https://news.ycombinator.com/rss",
            tags(&["Tech News", "Programming", "Startups"]),
        ),
        FeedSource::new(
            "betakit",
            "BetaKit",
            "https://betakit.com/feed/",
            tags(&["Canadian Tech", "Startups", "Tech News"]),
        ),
        FeedSource::new(
            "ainews",
            "AI News",
            "https://buttondown.com/ainews/rss",
            tags(&["AI", "Machine Learning", "Tech News"]),
        ),
        FeedSource::new(
            "r-technology",
            "r/technology",
            "https://www.reddit.com/r/technology",
            tags(&["Tech News", "Community"]),
        ),
    ]
}

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
