//! crates/news_digest_core/src/views.rs
//!
//! Read-side shapes derived from a digest: the card view grouped by category,
//! the per-user filtered digest and the availability summary.

use crate::domain::{Article, CategoryMap, Digest};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Display color for categories without an entry in the table below.
pub const FALLBACK_COLOR: &str = "#6B7280";

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Policy & Regulation", "#3B82F6"),
    ("Markets", "#10B981"),
    ("Startups & Innovation", "#8B5CF6"),
    ("Infrastructure & Real Estate", "#F59E0B"),
    ("Energy & Resources", "#EF4444"),
    ("Business News", "#6B7280"),
];

pub fn category_color(name: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(category, _)| *category == name)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Renders a digest timestamp as `HH:MM` local time.
///
/// Offset-qualified timestamps are converted to the local zone; naive ones, as
/// the pipeline writes them, are already local wall time. Anything else renders
/// as `-`.
pub fn format_clock(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%H:%M").to_string();
    }
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| "-".to_string())
}

//=========================================================================================
// Card View
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCard {
    pub name: String,
    pub articles: Vec<Article>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardStats {
    pub total_stories: usize,
    pub total_categories: usize,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedView {
    #[serde(serialize_with = "cards_as_map")]
    pub categories: Vec<CategoryCard>,
    pub stats: CardStats,
}

fn cards_as_map<S: Serializer>(cards: &[CategoryCard], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(cards.len()))?;
    for card in cards {
        map.serialize_entry(&card.name, card)?;
    }
    map.end()
}

/// Reshapes a digest into colored category cards with summary stats.
pub fn categorized_view(digest: &Digest) -> CategorizedView {
    let categories: Vec<CategoryCard> = digest
        .categories
        .iter()
        .map(|(name, articles)| CategoryCard {
            name: name.to_string(),
            articles: articles.to_vec(),
            color: category_color(name),
        })
        .collect();

    CategorizedView {
        stats: CardStats {
            total_stories: digest.total_items(),
            total_categories: categories.len(),
            last_updated: format_clock(digest.last_updated().unwrap_or_default()),
        },
        categories,
    }
}

//=========================================================================================
// Personalized View
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizedDigest {
    pub date: String,
    pub last_updated: String,
    pub categories: CategoryMap,
    pub total_items: usize,
    pub user_interests: Vec<String>,
}

/// Keeps only the categories named in `interests`, in interest order.
/// No interests means no filtering.
pub fn personalize(digest: &Digest, interests: &[String]) -> PersonalizedDigest {
    let categories: CategoryMap = if interests.is_empty() {
        digest.categories.clone()
    } else {
        interests
            .iter()
            .filter_map(|interest| {
                digest
                    .categories
                    .get(interest)
                    .map(|articles| (interest.clone(), articles.to_vec()))
            })
            .collect()
    };

    PersonalizedDigest {
        date: digest.date().unwrap_or_default().to_string(),
        last_updated: digest.last_updated().unwrap_or_default().to_string(),
        total_items: categories.article_count(),
        categories,
        user_interests: interests.to_vec(),
    }
}

//=========================================================================================
// Status Summary
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestSummary {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl DigestSummary {
    pub fn of(digest: Option<&Digest>) -> Self {
        match digest {
            Some(d) => Self {
                available: true,
                total_items: Some(d.total_items()),
                last_updated: d.last_updated().map(str::to_string),
                categories: Some(d.categories.names()),
            },
            None => Self {
                available: false,
                total_items: None,
                last_updated: None,
                categories: None,
            },
        }
    }
}
