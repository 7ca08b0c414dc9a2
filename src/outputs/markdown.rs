//! Markdown rendering for the landing grid and the article page.
//!
//! The same Markdown is printed by the CLI and converted to HTML by the web
//! server, so links always use the web routes (`/`, `/article/{slug}`).
//!
//! Every optional article field has a fixed fallback here; a missing image,
//! description or author never stops a page from rendering. Upstream text is
//! escaped before it is placed in Markdown, and only `http`/`https` URLs from
//! the upstream are ever turned into links or images.

use crate::models::{Article, Category};
use crate::slug::derive_slug;
use crate::utils::{escape_markdown, format_published, format_published_short, upcase};
use crate::views::{DetailState, DetailView, ListStatus, ListView};
use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Write};
use url::Url;

pub const SITE_NAME: &str = "News Today";
pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

const BREAKING_FALLBACK: &str = "A significant development has just occurred. Our team provides in-depth analysis and live updates as the situation develops.";

const CONTINUATION: [&str; 3] = [
    "This breaking news story continues to develop as more information becomes available. Our team is closely monitoring the situation and will provide updates as they emerge.",
    "The implications of this development could have far-reaching consequences across multiple sectors. Industry experts are analyzing the potential impact and what it means for the future.",
    "Stay tuned for more detailed analysis and expert commentary on this evolving story. We'll bring you the latest information as it becomes available.",
];

const NO_BODY: &str = "This article provides comprehensive coverage of the latest developments. For the full story and additional details, please visit the original source using the link below.";

/// The upstream's `[+1234 chars]` truncation marker at the end of `content`.
static TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\+\d+\s*chars\]$").expect("truncation pattern is valid"));

/// A fixed reader comment shown under every article.
#[derive(Debug, Clone, Copy)]
pub struct Comment {
    pub name: &'static str,
    pub date: &'static str,
    pub content: &'static str,
}

pub const COMMENTS: [Comment; 2] = [
    Comment {
        name: "Ethan Carter",
        date: "July 27, 2024",
        content: "Great coverage of the conference! It's exciting to see the progress in AI and sustainable tech.",
    },
    Comment {
        name: "Olivia Bennett",
        date: "July 27, 2024",
        content: "I agree! The focus on ethical considerations is also very important.",
    },
];

/// Route for an article, or `None` when its title has no slug.
pub fn article_href(article: &Article) -> Option<String> {
    let slug = derive_slug(&article.title);
    (!slug.is_empty()).then(|| format!("/article/{slug}"))
}

/// Landing route for a filter, leaving out defaults.
pub fn landing_href(category: Category, query: &str, show_all: bool) -> String {
    let mut params = Vec::new();
    if category != Category::All {
        params.push(format!("category={}", category.as_str()));
    }
    if !query.is_empty() {
        params.push(format!("search={}", urlencoding::encode(query)));
    }
    if show_all {
        params.push("all=true".to_string());
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Upstream URL usable as a Markdown link destination.
fn external_href(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| format!("<{}>", url.as_str()))
}

fn display_title(article: &Article) -> String {
    if article.title.trim().is_empty() {
        NO_TITLE.to_string()
    } else {
        escape_markdown(&article.title)
    }
}

fn display_description(article: &Article) -> String {
    match article.description.as_deref() {
        Some(d) if !d.trim().is_empty() => escape_markdown(d),
        _ => NO_DESCRIPTION.to_string(),
    }
}

fn display_source(article: &Article) -> String {
    match article.source_name() {
        Some(name) if !name.trim().is_empty() => escape_markdown(name),
        _ => UNKNOWN_SOURCE.to_string(),
    }
}

/// Byline: author, else source name, else a fixed placeholder.
pub fn byline(article: &Article) -> String {
    [article.author.as_deref(), article.source_name()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(escape_markdown)
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

/// Badge printed on each card in the grid.
pub fn card_badge(category: Category) -> String {
    match category {
        Category::All => "General".to_string(),
        other => upcase(other.as_str()),
    }
}

/// Paragraphs of article body text, unescaped.
///
/// `content` minus the truncation marker when present; otherwise the
/// description followed by a fixed continuation; otherwise a pointer to the
/// original source.
pub fn article_body(article: &Article) -> Vec<String> {
    if let Some(content) = article.content.as_deref() {
        let cleaned = TRUNCATION_MARKER.replace(content, "");
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            return vec![cleaned.to_string()];
        }
    }

    if let Some(description) = article.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let mut paragraphs = vec![description.trim().to_string()];
        paragraphs.extend(CONTINUATION.iter().map(|p| p.to_string()));
        return paragraphs;
    }

    vec![NO_BODY.to_string()]
}

fn write_title_link(md: &mut String, prefix: &str, article: &Article) -> fmt::Result {
    let title = display_title(article);
    match article_href(article) {
        Some(href) => writeln!(md, "{prefix} [{title}]({href})"),
        None => writeln!(md, "{prefix} {title}"),
    }
}

fn write_card(md: &mut String, article: &Article, category: Category) -> fmt::Result {
    write_title_link(md, "###", article)?;
    writeln!(
        md,
        "\n*{}* · {} · {}\n",
        card_badge(category),
        display_source(article),
        format_published_short(&article.published_at)
    )?;
    if let Some(src) = article.url_to_image.as_deref().and_then(external_href) {
        writeln!(md, "![{}]({})\n", display_title(article), src)?;
    }
    writeln!(md, "{}\n", display_description(article))
}

fn write_filter_bar(md: &mut String, active: Category) -> fmt::Result {
    let bar = Category::FILTERS
        .iter()
        .map(|&c| {
            if c == active {
                format!("**{}**", c.label())
            } else {
                format!("[{}]({})", c.label(), landing_href(c, "", false))
            }
        })
        .join(" · ");
    writeln!(md, "{bar}\n")
}

/// Render the landing page for `view`.
pub fn list_to_markdown(view: &ListView, today: NaiveDate) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = write_list(&mut md, view, today);
    md
}

fn write_list(md: &mut String, view: &ListView, today: NaiveDate) -> fmt::Result {
    writeln!(md, "# {SITE_NAME}\n")?;
    writeln!(md, "*{}*\n", today.format("%A, %B %-d, %Y"))?;
    write_filter_bar(md, view.category())?;

    if !view.query().is_empty() {
        writeln!(md, "Results for **{}**\n", escape_markdown(view.query()))?;
    }

    let current = landing_href(view.category(), view.query(), view.show_all());

    if let ListStatus::Failed(_) = view.status() {
        writeln!(md, "## Something Went Wrong\n")?;
        writeln!(md, "We couldn't load the latest news.\n")?;
        writeln!(md, "[Try Again]({current})\n")?;
        return write_footer(md);
    }

    if let Some(lead) = view.breaking() {
        writeln!(md, "## Breaking\n")?;
        write_title_link(md, "###", lead)?;
        let summary = match lead.description.as_deref() {
            Some(d) if !d.trim().is_empty() => escape_markdown(d),
            _ => BREAKING_FALLBACK.to_string(),
        };
        writeln!(md, "\n{summary}\n")?;
        if let Some(href) = article_href(lead) {
            writeln!(md, "[Read More]({href})\n")?;
        }
    }

    writeln!(md, "## {}\n", view.heading())?;

    if view.displayed().is_empty() {
        writeln!(md, "### No Articles Found\n")?;
        writeln!(md, "Try adjusting your search or filter criteria.\n")?;
        writeln!(md, "[Refresh News]({current})\n")?;
    } else {
        for article in view.displayed() {
            write_card(md, article, view.category())?;
        }
    }

    if view.has_more() {
        if view.show_all() {
            let href = landing_href(view.category(), view.query(), false);
            writeln!(md, "[Show Less]({href})\n")?;
        } else {
            let href = landing_href(view.category(), view.query(), true);
            writeln!(md, "[Show More Articles]({href})\n")?;
        }
    }

    write_footer(md)
}

/// Render the article page for `view`.
///
/// `Redirected` renders a short pointer back to the landing page; the web
/// server redirects instead of showing it.
pub fn detail_to_markdown(view: &DetailView) -> String {
    let mut md = String::new();
    let _ = write_detail(&mut md, view);
    md
}

fn write_detail(md: &mut String, view: &DetailView) -> fmt::Result {
    match view.state() {
        DetailState::Rendered {
            article,
            category,
            related,
        } => write_article(md, article, *category, related)?,
        DetailState::Failed(_) => {
            writeln!(md, "# Something Went Wrong\n")?;
            writeln!(md, "We couldn't load this article.\n")?;
            let retry = format!("/article/{}", urlencoding::encode(view.slug()));
            writeln!(md, "[Try Again]({retry}) · [Return to Home](/)\n")?;
        }
        DetailState::Loading | DetailState::Found { .. } => {
            writeln!(md, "# Loading\n")?;
        }
        DetailState::NotFound | DetailState::Redirected { .. } => {
            writeln!(md, "# Article Not Found\n")?;
            writeln!(md, "[Return to Home](/)\n")?;
        }
    }

    write_footer(md)
}

fn write_article(md: &mut String, article: &Article, category: Category, related: &[Article]) -> fmt::Result {
    let title = display_title(article);
    writeln!(
        md,
        "[News](/) / [{}]({}) / {}\n",
        category.label(),
        landing_href(category, "", false),
        title
    )?;
    writeln!(md, "# {title}\n")?;
    writeln!(
        md,
        "**{}** · By {} · Published on {}\n",
        category.label(),
        byline(article),
        format_published(&article.published_at)
    )?;

    if let Some(src) = article.url_to_image.as_deref().and_then(external_href) {
        writeln!(md, "![{title}]({src})\n")?;
    }

    for paragraph in article_body(article) {
        writeln!(md, "{}\n", escape_markdown(&paragraph))?;
    }

    if let Some(href) = external_href(&article.url) {
        writeln!(md, "[Read original article]({href})\n")?;
    }

    writeln!(md, "## Related Articles\n")?;
    if related.is_empty() {
        writeln!(md, "No related articles.\n")?;
    } else {
        for item in related {
            let item_title = display_title(item);
            match article_href(item) {
                Some(href) => writeln!(md, "- [{item_title}]({href}) · {}", display_source(item))?,
                None => writeln!(md, "- {item_title} · {}", display_source(item))?,
            }
        }
        writeln!(md)?;
    }

    writeln!(md, "## Comments ({})\n", COMMENTS.len())?;
    for comment in COMMENTS {
        writeln!(md, "**{}** · {}\n", comment.name, comment.date)?;
        writeln!(md, "> {}\n", escape_markdown(comment.content))?;
    }
    Ok(())
}

fn write_footer(md: &mut String) -> fmt::Result {
    writeln!(md, "---\n")?;
    writeln!(md, "© {SITE_NAME}. All rights reserved.")
}
