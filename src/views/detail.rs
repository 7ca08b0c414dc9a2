//! Article page state machine.
//!
//! ```text
//! Loading ──► Found ──► Rendered
//!    │
//!    ├──────► NotFound ──► Redirected
//!    │
//!    └──────► Failed
//! ```
//!
//! A lookup fetches the unfiltered headline list, recomputes every article's
//! slug and takes the first match. A found article is classified by its source
//! and a second, strictly later fetch collects up to two related articles from
//! that category. Transitions only ever move forward; a fresh lookup needs a
//! fresh [`DetailView`].

use crate::api::NewsSource;
use crate::classify::classify;
use crate::error::FetchFailed;
use crate::models::{Article, Category};
use crate::slug::{derive_slug, find_by_slug};
use tracing::{info, instrument, warn};

/// Where a missing article sends the reader.
pub const LANDING_ROUTE: &str = "/";

/// Upper bound on related articles shown under an article.
pub const MAX_RELATED: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Found {
        article: Article,
    },
    Rendered {
        article: Article,
        category: Category,
        related: Vec<Article>,
    },
    NotFound,
    Redirected {
        to: &'static str,
    },
    /// The primary fetch failed. Retrying means loading the route again.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct DetailView {
    slug: String,
    state: DetailState,
}

impl DetailView {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            state: DetailState::Loading,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Pick the addressed article out of an unfiltered collection.
    ///
    /// `Loading → Found` or `Loading → NotFound`. Ignored in any other state.
    pub fn locate(&mut self, articles: &[Article]) {
        if self.state != DetailState::Loading {
            return;
        }
        self.state = match find_by_slug(articles, &self.slug) {
            Some(article) => DetailState::Found {
                article: article.clone(),
            },
            None => {
                info!(slug = %self.slug, searched = articles.len(), "No article matches slug");
                DetailState::NotFound
            }
        };
    }

    /// `Loading → Failed`. Ignored in any other state.
    pub fn fail(&mut self, error: FetchFailed) {
        if self.state == DetailState::Loading {
            warn!(slug = %self.slug, error = %error, "Article lookup failed");
            self.state = DetailState::Failed(error.reason);
        }
    }

    /// `NotFound → Redirected`, returning where to send the reader.
    pub fn redirect(&mut self) -> Option<&'static str> {
        if self.state != DetailState::NotFound {
            return None;
        }
        self.state = DetailState::Redirected { to: LANDING_ROUTE };
        Some(LANDING_ROUTE)
    }

    /// Category to fetch related articles from, while in `Found`.
    pub fn related_category(&self) -> Option<Category> {
        match &self.state {
            DetailState::Found { article } => Some(match classify(article) {
                Category::All => Category::General,
                category => category,
            }),
            _ => None,
        }
    }

    /// `Found → Rendered`.
    ///
    /// Drops anything sharing the current slug and keeps at most
    /// [`MAX_RELATED`]. A failed related fetch still renders the article, just
    /// without related items.
    pub fn render(&mut self, related: Result<Vec<Article>, FetchFailed>) {
        let Some(category) = self.related_category() else {
            return;
        };
        let DetailState::Found { article } = std::mem::replace(&mut self.state, DetailState::Loading)
        else {
            return;
        };

        let related = match related {
            Ok(related) => related
                .into_iter()
                .filter(|a| derive_slug(&a.title) != self.slug)
                .take(MAX_RELATED)
                .collect(),
            Err(e) => {
                warn!(slug = %self.slug, %category, error = %e, "Related articles unavailable");
                Vec::new()
            }
        };

        self.state = DetailState::Rendered {
            article,
            category,
            related,
        };
    }

    /// Run the whole lookup against `source`.
    ///
    /// Ends in `Rendered`, `Redirected` or `Failed`.
    #[instrument(level = "info", skip_all, fields(slug = %self.slug))]
    pub async fn load<S: NewsSource>(&mut self, source: &S) {
        match source.fetch_news(Category::All, "").await {
            Ok(articles) => self.locate(&articles),
            Err(e) => {
                self.fail(e);
                return;
            }
        }

        if let Some(category) = self.related_category() {
            let related = source.fetch_news(category, "").await;
            self.render(related);
        } else {
            self.redirect();
        }
    }
}
