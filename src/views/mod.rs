//! Per-view state for the landing grid and the article page.
//!
//! Each view owns its state outright; nothing here is shared between views or
//! kept across requests. Both views talk to articles only through
//! [`NewsSource`](crate::api::NewsSource).
//!
//! - [`list`]: Category/search filter, loaded articles and the show-more fold
//! - [`detail`]: Slug lookup, related articles and the load state machine

pub mod detail;
pub mod list;

pub use detail::{DetailState, DetailView};
pub use list::{ListStatus, ListView};

#[cfg(test)]
pub(crate) mod testing {
    use crate::api::NewsSource;
    use crate::error::FetchFailed;
    use crate::models::{Article, Category};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted [`NewsSource`] keyed by `(category, query)`.
    ///
    /// Unscripted keys fail. Every call is recorded in order.
    #[derive(Default)]
    pub struct FakeSource {
        responses: HashMap<(Category, String), Result<Vec<Article>, FetchFailed>>,
        calls: Mutex<Vec<(Category, String)>>,
    }

    impl FakeSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, category: Category, query: &str, articles: Vec<Article>) -> Self {
            self.responses
                .insert((category, query.to_string()), Ok(articles));
            self
        }

        pub fn failing(mut self, category: Category, query: &str) -> Self {
            self.responses.insert(
                (category, query.to_string()),
                Err(FetchFailed::new("scripted failure")),
            );
            self
        }

        pub fn calls(&self) -> Vec<(Category, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl NewsSource for FakeSource {
        async fn fetch_news(&self, category: Category, query: &str) -> Result<Vec<Article>, FetchFailed> {
            self.calls
                .lock()
                .unwrap()
                .push((category, query.to_string()));
            self.responses
                .get(&(category, query.to_string()))
                .cloned()
                .unwrap_or_else(|| Err(FetchFailed::new("unscripted request")))
        }
    }
}
