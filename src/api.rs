//! Client for a NewsAPI-compatible upstream.
//!
//! This module owns the one place where articles enter the application. It
//! shapes the request from a category and a free-text query, performs a single
//! GET, and normalizes every way that can go wrong into [`FetchFailed`].
//!
//! # Architecture
//!
//! - [`NewsSource`]: Trait the views depend on, so they can be driven by a fake
//! - [`NewsRequest`]: Which endpoint to hit and with which filter
//! - [`NewsClient`]: The `reqwest` implementation talking to the upstream
//!
//! # Request shaping
//!
//! | Input | Endpoint | Parameters |
//! |-------|----------|------------|
//! | non-empty query | `everything` | `q`, `sortBy=publishedAt` |
//! | category `all` | `top-headlines` | `country` |
//! | any other category | `top-headlines` | `country`, `category` |
//!
//! Every request carries `pageSize=20` and the API key. There is no caching
//! and no retry: each call is one network exchange.

use crate::error::FetchFailed;
use crate::models::{Article, Category};
use crate::utils::truncate_for_log;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Fixed page size for every upstream request.
pub const PAGE_SIZE: u32 = 20;

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can produce a list of articles for a category and query.
///
/// Implementors must drop tombstoned articles before returning and must
/// report every failure as [`FetchFailed`].
pub trait NewsSource {
    /// Fetch articles for `category`, or search for `query` when it is non-empty.
    fn fetch_news(
        &self,
        category: Category,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Article>, FetchFailed>> + Send;
}

/// The upstream call a category/query pair resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsRequest {
    /// Relevance search sorted by recency. Category is ignored.
    Search { query: String },
    /// Top headlines for the configured country, optionally filtered.
    TopHeadlines { category: Option<Category> },
}

impl NewsRequest {
    /// Resolve the caller's filter into a request.
    pub fn new(category: Category, query: &str) -> Self {
        if !query.is_empty() {
            NewsRequest::Search {
                query: query.to_string(),
            }
        } else {
            NewsRequest::TopHeadlines {
                category: category.filter(),
            }
        }
    }

    /// Path segment of the upstream endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            NewsRequest::Search { .. } => "everything",
            NewsRequest::TopHeadlines { .. } => "top-headlines",
        }
    }
}

/// Connection settings for [`NewsClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL the endpoint name is appended to, e.g. `https://newsapi.org/v2`.
    pub base_url: Url,
    pub api_key: String,
    /// Region for top-headlines requests.
    pub country: String,
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("country", &self.country)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `reqwest`-backed [`NewsSource`].
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl NewsClient {
    /// Build a client with the configured timeout applied to every request.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Full upstream URL for `request`, including the API key.
    pub fn request_url(&self, request: &NewsRequest) -> Result<Url, FetchFailed> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchFailed::new(format!("base url `{}` cannot take a path", self.config.base_url)))?
            .pop_if_empty()
            .push(request.endpoint());

        {
            let mut query = url.query_pairs_mut();
            match request {
                NewsRequest::Search { query: q } => {
                    query.append_pair("q", q).append_pair("sortBy", "publishedAt");
                }
                NewsRequest::TopHeadlines { category } => {
                    query.append_pair("country", &self.config.country);
                    if let Some(category) = category {
                        query.append_pair("category", category.as_str());
                    }
                }
            }
            query
                .append_pair("pageSize", &PAGE_SIZE.to_string())
                .append_pair("apiKey", &self.config.api_key);
        }

        Ok(url)
    }
}

impl NewsSource for NewsClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch_news(&self, category: Category, query: &str) -> Result<Vec<Article>, FetchFailed> {
        let t0 = Instant::now();
        let request = NewsRequest::new(category, query);
        let url = self.request_url(&request)?;
        info!(endpoint = request.endpoint(), ?request, "Requesting articles");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let e = e.without_url();
                error!(
                    endpoint = request.endpoint(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    timeout = e.is_timeout(),
                    error = %e,
                    "Upstream request failed"
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchFailed::from(e.without_url()))?;
        debug!(%status, bytes = body.len(), "Upstream responded");

        match parse_response(status, &body) {
            Ok(articles) => {
                info!(
                    count = articles.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Retrieved articles"
                );
                Ok(articles)
            }
            Err(e) => {
                warn!(
                    %status,
                    reason = %e.reason,
                    body_preview = %truncate_for_log(&body, 300),
                    "Upstream response rejected"
                );
                Err(e)
            }
        }
    }
}

/// Upstream envelope for both endpoints.
#[derive(Debug, Deserialize)]
struct RawResponse {
    status: String,
    #[serde(default)]
    articles: Option<Vec<Article>>,
    #[serde(default)]
    message: Option<String>,
}

/// Shape of an upstream error body; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Turn an upstream HTTP status and body into articles or [`FetchFailed`].
///
/// Tombstoned articles are dropped here, so nothing downstream ever sees one.
fn parse_response(status: StatusCode, body: &str) -> Result<Vec<Article>, FetchFailed> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .unwrap_or_default()
            .message;
        return Err(FetchFailed::new(
            message.unwrap_or_else(|| format!("upstream returned HTTP {status}")),
        ));
    }

    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|e| FetchFailed::new(format!("malformed payload: {e}")))?;

    if raw.status != "ok" {
        return Err(FetchFailed::new(
            raw.message
                .unwrap_or_else(|| format!("upstream status `{}`", raw.status)),
        ));
    }

    let articles = raw
        .articles
        .ok_or_else(|| FetchFailed::new("response has no articles"))?;
    Ok(drop_tombstoned(articles))
}

/// Remove articles the upstream has withdrawn.
pub fn drop_tombstoned(articles: Vec<Article>) -> Vec<Article> {
    articles.into_iter().filter(|a| !a.is_tombstoned()).collect()
}
