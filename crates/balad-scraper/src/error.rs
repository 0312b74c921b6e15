use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid listing URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no structured data on page {page}: {detail}")]
    NoStructuredData { page: u32, detail: String },

    #[error("normalization error: {reason}")]
    Normalization { reason: String },
}

impl ScraperError {
    /// `true` for failures that happened before a usable response body was
    /// received (connection error, timeout, non-2xx status).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::NotFound { .. }
                | ScraperError::UnexpectedStatus { .. }
        )
    }
}
