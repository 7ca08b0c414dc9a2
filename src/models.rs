//! Data models for articles as served by a NewsAPI-compatible upstream.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: A single externally-sourced news item
//! - [`Source`]: The outlet an article was published by
//! - [`Category`]: The closed set of topical filters
//!
//! Articles are never created or mutated here; they are fetched, displayed and
//! dropped. Field names follow the upstream's camelCase JSON on the way in and
//! on the way out through the proxy endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title the upstream puts on articles it has withdrawn.
pub const TOMBSTONE_TITLE: &str = "[Removed]";

/// A news article as returned by the upstream API.
///
/// Only `title`, `url` and `publishedAt` are required. Everything else may be
/// missing and has a fallback presentation (see [`crate::outputs`]).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline. Also the identity source for slugs.
    pub title: String,
    /// Short excerpt.
    #[serde(default)]
    pub description: Option<String>,
    /// Body text, usually truncated by the upstream with a `[+N chars]` marker.
    #[serde(default)]
    pub content: Option<String>,
    /// Canonical external link.
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// ISO-8601 publication timestamp, kept verbatim.
    pub published_at: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: Source,
}

impl Article {
    /// Whether the upstream has withdrawn this article.
    pub fn is_tombstoned(&self) -> bool {
        self.title == TOMBSTONE_TITLE
    }

    /// Source name, if the upstream provided one.
    pub fn source_name(&self) -> Option<&str> {
        self.source.name.as_deref()
    }
}

/// The outlet that published an article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Topical category used both as a request filter and as a display label.
///
/// [`Category::All`] is a query-scope sentinel: it means "no category filter"
/// and is never produced by [`crate::classify::classify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    General,
    World,
    Politics,
    Business,
    Technology,
    Entertainment,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::General,
        Category::World,
        Category::Politics,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
    ];

    /// Categories offered in the landing page filter bar.
    pub const FILTERS: [Category; 6] = [
        Category::All,
        Category::General,
        Category::World,
        Category::Politics,
        Category::Business,
        Category::Technology,
    ];

    /// Lowercase wire name, as sent upstream and accepted in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::General => "general",
            Category::World => "world",
            Category::Politics => "politics",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
        }
    }

    /// Human-facing navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::General => "Top Stories",
            Category::World => "World",
            Category::Politics => "Politics",
            Category::Business => "Business",
            Category::Technology => "Tech",
            Category::Entertainment => "Culture",
        }
    }

    /// Category filter to send upstream, `None` for the `all` sentinel.
    pub fn filter(self) -> Option<Category> {
        match self {
            Category::All => None,
            other => Some(other),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn sample_article(title: &str, source: Option<&str>) -> Article {
    Article {
        title: title.to_string(),
        description: None,
        content: None,
        url: format!("https://example.com/{}", title.len()),
        url_to_image: None,
        published_at: "2024-07-27T15:04:00Z".to_string(),
        author: None,
        source: Source {
            id: None,
            name: source.map(str::to_string),
        },
    }
}
