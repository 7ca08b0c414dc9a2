//! Landing grid state.
//!
//! A [`ListView`] holds the current category and search query, the articles
//! from the last successful load, and whether the grid is folded to the first
//! [`ListView::FOLD`] articles.
//!
//! # Stale responses
//!
//! Every load is stamped with a generation number. When the filter changes and
//! a new load is issued before the previous one returns, the older response is
//! discarded on arrival instead of overwriting the newer one.
//!
//! # Failures
//!
//! A failed load flips the status to [`ListStatus::Failed`] but leaves the
//! previously loaded articles untouched. Retrying is just loading again.

use crate::api::NewsSource;
use crate::error::FetchFailed;
use crate::models::{Article, Category};
use tracing::{debug, instrument, warn};

/// Where the most recent load stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Stamp for one issued load. Hand it back to [`ListView::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub category: Category,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct ListView {
    category: Category,
    query: String,
    articles: Vec<Article>,
    status: ListStatus,
    show_all: bool,
    generation: u64,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(Category::All, "")
    }
}

impl ListView {
    /// Number of articles shown before "show more".
    pub const FOLD: usize = 6;

    pub fn new(category: Category, query: &str) -> Self {
        Self {
            category,
            query: query.to_string(),
            articles: Vec::new(),
            status: ListStatus::Loading,
            show_all: false,
            generation: 0,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Switch category. Folds the grid again.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.show_all = false;
    }

    /// Replace the search query. Folds the grid again.
    pub fn set_search(&mut self, query: &str) {
        self.query = query.to_string();
        self.show_all = false;
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }

    /// Issue a new load for the current filter and mark the view as loading.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = ListStatus::Loading;
        LoadTicket {
            generation: self.generation,
            category: self.category,
            query: self.query.clone(),
        }
    }

    /// Apply the outcome of a load.
    ///
    /// Returns `false` and changes nothing when `ticket` is not the latest
    /// issued load.
    pub fn apply(&mut self, ticket: &LoadTicket, result: Result<Vec<Article>, FetchFailed>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale article response"
            );
            return false;
        }

        match result {
            Ok(articles) => {
                self.articles = articles;
                self.status = ListStatus::Ready;
            }
            Err(e) => {
                warn!(category = %ticket.category, query = %ticket.query, error = %e, "Article load failed");
                self.status = ListStatus::Failed(e.reason);
            }
        }
        true
    }

    /// Load articles for the current filter.
    #[instrument(level = "debug", skip_all, fields(category = %self.category, query = %self.query))]
    pub async fn load<S: NewsSource>(&mut self, source: &S) {
        let ticket = self.begin_load();
        let result = source.fetch_news(ticket.category, &ticket.query).await;
        self.apply(&ticket, result);
    }

    /// The lead article shown in the breaking-news banner.
    pub fn breaking(&self) -> Option<&Article> {
        self.articles.first()
    }

    /// Articles in the grid, folded unless [`ListView::show_all`] is set.
    pub fn displayed(&self) -> &[Article] {
        if self.show_all {
            &self.articles
        } else {
            &self.articles[..self.articles.len().min(Self::FOLD)]
        }
    }

    /// Whether there are articles beyond the fold.
    pub fn has_more(&self) -> bool {
        self.articles.len() > Self::FOLD
    }

    /// Section heading above the grid.
    pub fn heading(&self) -> String {
        match self.category {
            Category::All => "Recent Articles".to_string(),
            other => format!("{} News", other.label()),
        }
    }
}
