//! URL identifiers derived from article titles.
//!
//! A slug is computed, never stored: the list view derives it to build a link
//! and the detail view derives it again for every fetched article to find the
//! one being addressed. Both sides must therefore call [`derive_slug`].
//!
//! Slugs are lossy and not unique. Two titles that normalize identically
//! collide, and [`find_by_slug`] resolves the collision to whichever article
//! comes first in the collection.

use crate::models::Article;
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

/// Convert a title to a URL-safe slug.
///
/// Lowercases the title, replaces every run of characters outside `[a-z0-9]`
/// with a single hyphen, then strips leading and trailing hyphens.
///
/// An empty result means the title has no stable identifier.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(derive_slug("Fed Raises Rates Again!"), "fed-raises-rates-again");
/// assert_eq!(derive_slug("???"), "");
/// ```
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    SEPARATOR_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// First article whose derived slug equals `slug`.
///
/// An empty `slug` never matches, even against an article whose title has no
/// slug-able characters.
pub fn find_by_slug<'a>(articles: &'a [Article], slug: &str) -> Option<&'a Article> {
    if slug.is_empty() {
        return None;
    }
    articles.iter().find(|a| derive_slug(&a.title) == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_article;

    #[test]
    fn test_derive_slug_scenarios() {
        assert_eq!(derive_slug("Fed Raises Rates Again!"), "fed-raises-rates-again");
        assert_eq!(derive_slug("  ---Hello, World???---  "), "hello-world");
    }

    #[test]
    fn test_derive_slug_collapses_separators() {
        assert_eq!(derive_slug("a  --  b"), "a-b");
        assert_eq!(derive_slug("Trump-Xi 'situationship'"), "trump-xi-situationship");
        assert_eq!(derive_slug("C++ & Rust: 2024"), "c-rust-2024");
    }

    #[test]
    fn test_derive_slug_degenerate_titles() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("!!! ??? ..."), "");
        assert_eq!(derive_slug("2024"), "2024");
    }

    #[test]
    fn test_derive_slug_non_ascii_is_separator() {
        assert_eq!(derive_slug("Café Society"), "caf-society");
        assert_eq!(derive_slug("Ünïcode"), "n-code");
    }

    #[test]
    fn test_derive_slug_idempotent() {
        let titles = [
            "Fed Raises Rates Again!",
            "  ---Hello, World???---  ",
            "Breaking: 5 Things to Know",
            "Café Society",
            "",
        ];
        for title in titles {
            let once = derive_slug(title);
            assert_eq!(derive_slug(&once), once, "title: {title:?}");
        }
    }

    #[test]
    fn test_find_by_slug_first_match_wins() {
        let articles = vec![
            sample_article("Other story", None),
            sample_article("Hello, World!", Some("First")),
            sample_article("hello world", Some("Second")),
        ];

        let found = find_by_slug(&articles, "hello-world").unwrap();
        assert_eq!(found.source_name(), Some("First"));
    }

    #[test]
    fn test_find_by_slug_no_match() {
        let articles = vec![sample_article("Something", None)];
        assert!(find_by_slug(&articles, "nothing").is_none());
    }

    #[test]
    fn test_find_by_slug_empty_never_matches() {
        let articles = vec![sample_article("???", None)];
        assert!(find_by_slug(&articles, "").is_none());
    }
}
