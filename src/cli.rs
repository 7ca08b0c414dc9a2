//! Command-line interface definitions for News Today.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Upstream settings are global and can be provided via command-line
//! flags or environment variables.

use crate::api::{ClientConfig, DEFAULT_TIMEOUT};
use crate::models::Category;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the News Today application.
///
/// # Examples
///
/// ```sh
/// # Serve the site on the default address
/// news_today --api-key YOUR_KEY serve
///
/// # Print technology headlines as Markdown
/// NEWS_API_KEY=YOUR_KEY news_today headlines --category technology
///
/// # Print a single article
/// news_today --api-key YOUR_KEY article fed-raises-rates-again
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// API key sent with every upstream request
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the NewsAPI-compatible service
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = "https://newsapi.org/v2")]
    pub base_url: Url,

    /// Region for top-headlines requests
    #[arg(long, env = "NEWS_COUNTRY", default_value = "us")]
    pub country: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "NEWS_API_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the web front end and the `/api/news` proxy
    Serve {
        /// Address to listen on
        #[arg(long, env = "NEWS_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// Print the landing grid as Markdown
    Headlines {
        /// Category filter (all, general, world, politics, business, technology, entertainment)
        #[arg(short, long, default_value_t = Category::All)]
        category: Category,

        /// Free-text search; switches to the search endpoint
        #[arg(short, long, default_value = "")]
        search: String,

        /// Show every article instead of folding after six
        #[arg(short, long)]
        all: bool,
    },

    /// Print one article, addressed by its slug, as Markdown
    Article {
        /// Slug derived from the article title, e.g. `fed-raises-rates-again`
        slug: String,
    },
}

impl Cli {
    /// Upstream client settings taken from the global flags.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            country: self.country.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
