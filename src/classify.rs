//! Source-name heuristic that assigns a display category to an article.
//!
//! Only the outlet name is inspected, never the headline or body, so every
//! story from one outlet lands in the same category. The token groups are
//! tested in priority order and the first group with a hit wins; reordering
//! [`RULES`] changes the result for outlets that match several groups.

use crate::models::{Article, Category};

/// Token groups in priority order.
const RULES: &[(Category, &[&str])] = &[
    (Category::Technology, &["tech", "ai", "digital"]),
    (Category::Business, &["business", "finance", "market"]),
    (Category::Politics, &["politics", "government"]),
    (Category::Entertainment, &["entertainment", "movie", "music"]),
    (Category::World, &["world", "global"]),
];

/// Classify an article by its source name.
///
/// Never returns [`Category::All`]; falls back to [`Category::General`].
pub fn classify(article: &Article) -> Category {
    classify_source(article.source_name().unwrap_or_default())
}

/// Classify a bare source name. See [`classify`].
pub fn classify_source(source_name: &str) -> Category {
    let name = source_name.to_lowercase();
    RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| name.contains(token)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}
