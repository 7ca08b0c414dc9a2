//! # News Today
//!
//! A small news reader on top of a NewsAPI-compatible service. Headlines and
//! search results are shown as a filterable grid, and every article gets its
//! own page addressed by a slug derived from its title.
//!
//! ## Features
//!
//! - Top headlines per category, or free-text search across everything
//! - Article pages with related stories from the same inferred category
//! - A web front end with a same-origin `/api/news` proxy
//! - The same pages printed as Markdown in the terminal
//!
//! ## Usage
//!
//! ```sh
//! news_today --api-key YOUR_KEY serve --bind 127.0.0.1:3000
//! news_today --api-key YOUR_KEY headlines --category business
//! news_today --api-key YOUR_KEY article fed-raises-rates-again
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`api::NewsClient`] shapes one upstream request and
//!    normalizes every failure into [`error::FetchFailed`]
//! 2. **Lookup**: [`slug`] and [`classify`] turn titles into routes and
//!    source names into categories
//! 3. **Views**: [`views::ListView`] and [`views::DetailView`] hold per-page
//!    state and drive the fetches
//! 4. **Output**: [`outputs`] renders views as Markdown, and as HTML pages
//!    for [`server`]

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod classify;
mod cli;
mod error;
mod models;
mod outputs;
mod server;
mod slug;
mod utils;
mod views;

use api::NewsClient;
use cli::{Cli, Command};
use error::NewsError;
use models::Category;
use outputs::markdown;
use views::{DetailState, DetailView, ListStatus, ListView};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_today starting up");

    let args = Cli::parse();
    let config = args.client_config();
    debug!(?config, "Parsed CLI arguments");

    let client = NewsClient::new(config)
        .map_err(|e| NewsError::Config(format!("cannot build HTTP client: {e}")))?;

    let result = match args.command {
        Command::Serve { bind } => server::serve(bind, client).await,
        Command::Headlines {
            category,
            search,
            all,
        } => headlines(&client, category, &search, all).await,
        Command::Article { slug } => article(&client, &slug).await,
    };

    if let Err(ref e) = result {
        error!(error = %e, "Command failed");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    result?;
    Ok(())
}

/// Print the landing grid for a filter.
#[instrument(level = "info", skip(client))]
async fn headlines(client: &NewsClient, category: Category, search: &str, all: bool) -> Result<(), NewsError> {
    let mut view = ListView::default();
    view.set_category(category);
    view.set_search(search);
    if all {
        view.toggle_show_all();
    }
    view.load(client).await;

    if let ListStatus::Failed(reason) = view.status() {
        return Err(error::FetchFailed::new(reason.clone()).into());
    }

    info!(
        count = view.articles().len(),
        shown = view.displayed().len(),
        "Loaded headlines"
    );
    println!("{}", markdown::list_to_markdown(&view, Local::now().date_naive()));
    Ok(())
}

/// Print one article, or fail when the slug matches nothing.
#[instrument(level = "info", skip(client))]
async fn article(client: &NewsClient, slug: &str) -> Result<(), NewsError> {
    let mut view = DetailView::new(slug);
    view.load(client).await;

    match view.state() {
        DetailState::Rendered { related, .. } => {
            info!(related = related.len(), "Rendered article");
            println!("{}", markdown::detail_to_markdown(&view));
            Ok(())
        }
        DetailState::Failed(reason) => Err(error::FetchFailed::new(reason.clone()).into()),
        _ => Err(NewsError::ArticleNotFound(view.slug().to_string())),
    }
}
