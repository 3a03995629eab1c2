//! crates/news_digest_core/src/domain.rs
//!
//! Defines the core data structures for the application: the digest written
//! by the external pipeline, the user records and the login sessions.
//!
//! The digest types round-trip the pipeline's JSON verbatim: only the category
//! order is modelled, everything else is kept as written and read through
//! accessors.

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

//=========================================================================================
// Digest (produced externally, read-only here)
//=========================================================================================

/// A single summarized news article, held as the pipeline wrote it.
///
/// Fields are read through accessors that tolerate absent or `null` values,
/// so an article with gaps still renders and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article(Value);

impl Article {
    /// A string field, or `None` when it is absent, `null` or not a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> &str {
        self.text("title").unwrap_or_default()
    }

    pub fn link(&self) -> &str {
        self.text("link").unwrap_or_default()
    }

    pub fn published(&self) -> Option<&str> {
        self.text("published")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Article {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// The current snapshot of categorized articles.
///
/// Only `categories` is modelled; every other top-level field stays in
/// `fields` exactly as written and is read through the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Digest {
    #[serde(default)]
    pub categories: CategoryMap,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Digest {
    pub fn date(&self) -> Option<&str> {
        self.fields.get("date").and_then(Value::as_str)
    }

    /// When the pipeline last wrote this digest.
    pub fn last_updated(&self) -> Option<&str> {
        self.fields.get("last_updated").and_then(Value::as_str)
    }

    /// The item count the pipeline declared; zero when missing.
    pub fn total_items(&self) -> usize {
        self.fields
            .get("total_items")
            .and_then(Value::as_u64)
            .map_or(0, |n| n as usize)
    }
}

/// An insertion-ordered map from category name to its articles.
///
/// Serializes as a JSON object whose keys keep the order the pipeline wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap(Vec<(String, Vec<Article>)>);

impl CategoryMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[Article]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, articles)| articles.as_slice())
    }

    /// Inserts a category, replacing the articles of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, articles: Vec<Article>) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = articles,
            None => self.0.push((name, articles)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Article])> {
        self.0.iter().map(|(n, a)| (n.as_str(), a.as_slice()))
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Sum of the article counts across all categories.
    pub fn article_count(&self) -> usize {
        self.0.iter().map(|(_, a)| a.len()).sum()
    }
}

impl FromIterator<(String, Vec<Article>)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Article>)>>(iter: I) -> Self {
        let mut map = CategoryMap::new();
        for (name, articles) in iter {
            map.insert(name, articles);
        }
        map
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, articles) in &self.0 {
            map.serialize_entry(name, articles)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoryMapVisitor;

        impl<'de> Visitor<'de> for CategoryMapVisitor {
            type Value = CategoryMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to article lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CategoryMap, A::Error> {
                let mut map = CategoryMap::new();
                // A `null` category reads as empty.
                while let Some((name, articles)) =
                    access.next_entry::<String, Option<Vec<Article>>>()?
                {
                    map.insert(name, articles.unwrap_or_default());
                }
                Ok(map)
            }

            fn visit_unit<E: de::Error>(self) -> Result<CategoryMap, E> {
                Ok(CategoryMap::new())
            }
        }

        deserializer.deserialize_any(CategoryMapVisitor)
    }
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// A user record as persisted in `users.json`.
///
/// `password` holds an argon2 PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// The user fields that are safe to hand back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub interests: Vec<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            interests: user.interests.clone(),
        }
    }
}

/// A partial profile edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Merges the update into `user`. A blank name is ignored.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            user.name = name.to_string();
        }
        if let Some(interests) = &self.interests {
            user.interests = interests.clone();
        }
    }
}

/// A login session, keyed by its opaque bearer token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
