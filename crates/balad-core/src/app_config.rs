use std::path::PathBuf;
use std::str::FromStr;

/// What the aggregation run does when a single page cannot be fetched or
/// yields no structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageErrorPolicy {
    /// Stop the run and keep whatever was accumulated before the failure.
    #[default]
    Halt,
    /// Log the failure, skip the page, and continue with the next ordinal.
    Skip,
}

impl std::fmt::Display for PageErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageErrorPolicy::Halt => write!(f, "halt"),
            PageErrorPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page error policy '{0}'; expected 'halt' or 'skip'")]
pub struct UnknownPolicy(pub String);

impl FromStr for PageErrorPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "halt" => Ok(PageErrorPolicy::Halt),
            "skip" => Ok(PageErrorPolicy::Skip),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upstream origin, e.g. `https://balad.ir`.
    pub base_url: String,
    /// Listing category path segment (`cat-{category}`).
    pub category: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Mandatory pause between successive page fetches.
    pub inter_request_delay_ms: u64,
    /// Ceiling on the page ordinal; always at least 1.
    pub max_pages: u32,
    pub on_page_error: PageErrorPolicy,
    pub log_level: String,
    pub cities_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}
