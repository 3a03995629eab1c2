//! crates/news_digest_core/src/presentation.rs
//!
//! The client-facing half of the digest contract: the flattened feed and the
//! background refresh policy shared by every front end.

use crate::domain::{Article, CategoryMap};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::Duration;

//=========================================================================================
// Feed
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    pub articles: Vec<Article>,
    pub total_items: usize,
    pub last_updated: String,
}

/// Parses the pipeline's `published` field: RFC 3339, RFC 2822 (RSS) or a naive
/// ISO timestamp taken as UTC.
pub fn published_at(article: &Article) -> Option<DateTime<Utc>> {
    let raw = article.published()?.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

/// Merges every category into one list, newest first.
///
/// Articles sharing a link appear once (first occurrence wins). Articles
/// without a usable date go last, in digest order.
pub fn flatten_feed(categories: &CategoryMap) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut articles = Vec::new();
    for (_, category) in categories.iter() {
        for article in category {
            let link = article.link();
            if link.is_empty() || seen.insert(link) {
                articles.push(article.clone());
            }
        }
    }
    articles.sort_by_key(|a| Reverse(published_at(a)));
    articles
}

pub fn feed_view(categories: &CategoryMap, last_updated: &str) -> FeedView {
    let articles = flatten_feed(categories);
    FeedView {
        total_items: articles.len(),
        articles,
        last_updated: last_updated.to_string(),
    }
}

//=========================================================================================
// Refresh Policy
//=========================================================================================

/// How often clients poll `/api/refresh` and whether scrolling defers a tick.
/// Clients receive it through `/api/client-config` and apply it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub interval: Duration,
    pub suppress_while_scrolling: bool,
    /// How long after the last scroll event the user counts as idle.
    pub scroll_idle: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            suppress_while_scrolling: true,
            scroll_idle: Duration::from_millis(150),
        }
    }
}

/// Reports whether a refresh brought a digest newer than the one already shown.
/// The first observed timestamp is the baseline, not news, and so is a digest
/// that carries no timestamp at all.
pub fn has_new_content(previous: Option<&str>, current: Option<&str>) -> bool {
    match (previous, current) {
        (Some(prev), Some(current)) => prev != current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn article(link: &str, published: Option<&str>) -> Article {
        let mut value = json!({"title": link.to_uppercase(), "link": link});
        if let Some(published) = published {
            value["published"] = json!(published);
        }
        Article::from(value)
    }

    fn links(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(Article::link).collect()
    }

    #[test]
    fn feed_is_newest_first_with_undated_last() {
        let mut categories = CategoryMap::new();
        categories.insert(
            "Markets",
            vec![
                article("old", Some("2025-01-01T09:00:00")),
                article("undated", None),
            ],
        );
        categories.insert(
            "Policy & Regulation",
            vec![
                article("rss", Some("Thu, 02 Jan 2025 10:00:00 +0000")),
                article("garbled", Some("soon")),
                article("new", Some("2025-01-03T00:00:00Z")),
            ],
        );

        let feed = flatten_feed(&categories);
        assert_eq!(links(&feed), vec!["new", "rss", "old", "undated", "garbled"]);
    }

    #[test]
    fn feed_drops_repeated_links() {
        let mut categories = CategoryMap::new();
        categories.insert("Markets", vec![article("dup", None), article("", None)]);
        categories.insert("Business News", vec![article("dup", None), article("", None)]);

        let view = feed_view(&categories, "2025-01-02T08:00:00");
        assert_eq!(links(&view.articles), vec!["dup", "", ""]);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.last_updated, "2025-01-02T08:00:00");
    }

    #[test]
    fn only_a_changed_timestamp_counts_as_new_content() {
        let first = Some("2025-01-02T08:00:00");
        assert!(!has_new_content(None, first));
        assert!(!has_new_content(first, first));
        assert!(!has_new_content(first, None));
        assert!(has_new_content(first, Some("2025-01-02T08:30:00")));
    }
}
