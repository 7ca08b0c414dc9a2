use thiserror::Error;

/// Any failure while retrieving articles.
///
/// Transport errors, timeouts, non-success HTTP statuses, an upstream
/// `status` other than `"ok"` and unparseable payloads all collapse into this
/// one type. `reason` is for logs and humans; callers must not branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch news: {reason}")]
pub struct FetchFailed {
    pub reason: String,
}

impl FetchFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for FetchFailed {
    fn from(e: reqwest::Error) -> Self {
        FetchFailed::new(e.to_string())
    }
}

/// Errors surfaced by the command-line entry points.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error(transparent)]
    FetchFailed(#[from] FetchFailed),

    #[error("no article matches slug `{0}`")]
    ArticleNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
