//! Web front end and same-origin proxy.
//!
//! # Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | Landing grid for `?category=&search=&all=` |
//! | `GET /article/{slug}` | Article page, or `303` to `/` when nothing matches |
//! | `GET /api/news` | `200` JSON array of articles, or `500 {"error": …}` |
//!
//! Pages are rendered on the server, so the upstream API key never leaves
//! this process. The JSON route exists for clients that want the article list
//! without going to the upstream themselves.

use crate::api::NewsSource;
use crate::error::NewsError;
use crate::models::Category;
use crate::outputs::{html, markdown};
use crate::views::{DetailState, DetailView, ListStatus, ListView};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::Local;
use serde::{Deserialize, Deserializer, de};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Shared, read-only server state.
pub struct AppState<S> {
    pub source: S,
}

/// Read a `category` query value, treating an empty value as [`Category::All`].
fn category_or_all<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(Category::All);
    }
    raw.parse().map_err(de::Error::custom)
}

/// Query string for `/api/news`.
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    #[serde(default, deserialize_with = "category_or_all")]
    pub category: Category,
    #[serde(default)]
    pub search: String,
}

/// Query string for `/`.
#[derive(Debug, Default, Deserialize)]
pub struct LandingParams {
    #[serde(default, deserialize_with = "category_or_all")]
    pub category: Category,
    #[serde(default)]
    pub search: String,
    /// Show every article instead of folding after six.
    #[serde(default)]
    pub all: bool,
}

pub fn router<S>(source: S) -> Router
where
    S: NewsSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(landing::<S>))
        .route("/article/{slug}", get(article::<S>))
        .route("/api/news", get(api_news::<S>))
        .with_state(Arc::new(AppState { source }))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve<S>(addr: SocketAddr, source: S) -> Result<(), NewsError>
where
    S: NewsSource + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(source))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(state))]
async fn api_news<S>(State(state): State<Arc<AppState<S>>>, Query(params): Query<NewsParams>) -> Response
where
    S: NewsSource + Send + Sync + 'static,
{
    match state.source.fetch_news(params.category, &params.search).await {
        Ok(articles) => (StatusCode::OK, Json(articles)).into_response(),
        Err(e) => {
            warn!(error = %e, "Proxy fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch news" })),
            )
                .into_response()
        }
    }
}

#[instrument(level = "info", skip(state))]
async fn landing<S>(State(state): State<Arc<AppState<S>>>, Query(params): Query<LandingParams>) -> Response
where
    S: NewsSource + Send + Sync + 'static,
{
    let mut view = ListView::new(params.category, &params.search);
    if params.all {
        view.toggle_show_all();
    }
    view.load(&state.source).await;

    let status = match view.status() {
        ListStatus::Failed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    let body = markdown::list_to_markdown(&view, Local::now().date_naive());
    let header = html::search_form(view.category(), view.query());
    (status, Html(html::page(markdown::SITE_NAME, &header, &body))).into_response()
}

#[instrument(level = "info", skip(state))]
async fn article<S>(State(state): State<Arc<AppState<S>>>, Path(slug): Path<String>) -> Response
where
    S: NewsSource + Send + Sync + 'static,
{
    let mut view = DetailView::new(&slug);
    view.load(&state.source).await;

    match view.state() {
        DetailState::Redirected { to } => Redirect::to(to).into_response(),
        DetailState::Rendered { article, .. } => {
            let body = markdown::detail_to_markdown(&view);
            Html(html::page(&article.title, "", &body)).into_response()
        }
        DetailState::Failed(_) => {
            let body = markdown::detail_to_markdown(&view);
            (StatusCode::BAD_GATEWAY, Html(html::page(markdown::SITE_NAME, "", &body))).into_response()
        }
        other => {
            warn!(state = ?other, "Article lookup ended in a non-terminal state");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, sample_article};
    use crate::views::testing::FakeSource;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn headlines() -> Vec<Article> {
        vec![
            sample_article("Fed Raises Rates Again!", Some("Bloomberg Markets")),
            sample_article("Summit Opens", Some("BBC World News")),
        ]
    }

    #[tokio::test]
    async fn test_api_news_success() {
        let app = router(FakeSource::new().with(Category::Technology, "", headlines()));
        let (status, _, body) = get(app, "/api/news?category=technology").await;

        assert_eq!(status, StatusCode::OK);
        let articles: Vec<Article> = serde_json::from_str(&body).unwrap();
        assert_eq!(articles, headlines());
        assert!(body.contains("\"publishedAt\""));
    }

    #[tokio::test]
    async fn test_api_news_defaults_to_all() {
        let source = FakeSource::new().with(Category::All, "", headlines());
        let (status, _, _) = get(router(source), "/api/news").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_news_search() {
        let source = FakeSource::new().with(Category::All, "rate hike", headlines());
        let (status, _, _) = get(router(source), "/api/news?search=rate%20hike").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_news_failure_is_500() {
        let app = router(FakeSource::new().failing(Category::All, ""));
        let (status, _, body) = get(app, "/api/news").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "error": "Failed to fetch news" }));
    }

    #[tokio::test]
    async fn test_api_news_rejects_unknown_category() {
        let app = router(FakeSource::new());
        let (status, _, _) = get(app, "/api/news?category=sports").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_category_means_all() {
        let source = FakeSource::new().with(Category::All, "", headlines());
        let app = router(source);
        let (status, _, _) = get(app.clone(), "/api/news?category=").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = get(app, "/?category=&search=").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>Recent Articles</h2>"));
    }

    #[tokio::test]
    async fn test_landing_rejects_unknown_category() {
        let (status, _, _) = get(router(FakeSource::new()), "/?category=sports").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_landing_renders_grid() {
        let app = router(FakeSource::new().with(Category::World, "", headlines()));
        let (status, _, body) = get(app, "/?category=world").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>World News</h2>"));
        assert!(body.contains("href=\"/article/summit-opens\""));
        assert!(body.contains("name=\"category\" value=\"world\""));
    }

    #[tokio::test]
    async fn test_landing_failure_offers_retry() {
        let app = router(FakeSource::new().failing(Category::All, ""));
        let (status, _, body) = get(app, "/").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Something Went Wrong"));
        assert!(body.contains("Try Again"));
    }

    #[tokio::test]
    async fn test_article_page_found() {
        let source = FakeSource::new()
            .with(Category::All, "", headlines())
            .with(Category::Business, "", headlines());
        let (status, _, body) = get(router(source), "/article/fed-raises-rates-again").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Fed Raises Rates Again!</title>"));
        assert!(body.contains("Related Articles"));
        assert!(body.contains("href=\"/article/summit-opens\""));
    }

    #[tokio::test]
    async fn test_article_not_found_redirects_home() {
        let source = FakeSource::new().with(Category::All, "", headlines());
        let (status, location, _) = get(router(source), "/article/no-such-story").await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_article_fetch_failure_offers_retry() {
        let source = FakeSource::new().failing(Category::All, "");
        let (status, _, body) = get(router(source), "/article/anything").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("href=\"/article/anything\""));
    }

    #[tokio::test]
    async fn test_article_retry_link_cannot_be_hijacked_by_slug() {
        let source = FakeSource::new().failing(Category::All, "");
        let (status, _, body) = get(
            router(source),
            "/article/x)%20%5Bclick%5D(javascript:alert(1))",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.contains("href=\"javascript:"));
        assert!(body.contains(
            "href=\"/article/x%29%20%5Bclick%5D%28javascript%3Aalert%281%29%29\""
        ));
    }
}
