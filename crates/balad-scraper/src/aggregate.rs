//! Multi-page aggregation run.
//!
//! Pages are fetched strictly one at a time, with a fixed pause between
//! successive fetches. Termination is decided by [`Paginator`]; failures are
//! handled according to [`PageErrorPolicy`].

use std::time::Duration;

use balad_core::{AppConfig, CanonicalListing, PageErrorPolicy};
use tokio::sync::watch;

use crate::client::PageSource;
use crate::page::PageResult;
use crate::pagination::{Paginator, Step, StopReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Ceiling on the page ordinal.
    pub max_pages: u32,
    /// Pause inserted between successive page fetches.
    pub delay: Duration,
    pub on_page_error: PageErrorPolicy,
}

impl RunOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            delay: Duration::from_millis(config.inter_request_delay_ms),
            on_page_error: config.on_page_error,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEnd {
    /// Pagination stopped normally.
    Paginated(StopReason),
    /// A page failed under [`PageErrorPolicy::Halt`].
    PageFailed { page: u32, error: String },
    /// The stop signal was raised; `next_page` was never completed.
    Interrupted { next_page: u32 },
}

impl std::fmt::Display for RunEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunEnd::Paginated(reason) => write!(f, "{reason}"),
            RunEnd::PageFailed { page, error } => write!(f, "page {page} failed: {error}"),
            RunEnd::Interrupted { next_page } => write!(f, "interrupted before page {next_page}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Every listing from every successful page, in page order. Not deduplicated.
    pub listings: Vec<CanonicalListing>,
    pub pages_fetched: u32,
    pub failed_pages: Vec<u32>,
    pub end: RunEnd,
}

impl RunReport {
    #[must_use]
    pub fn was_interrupted(&self) -> bool {
        matches!(self.end, RunEnd::Interrupted { .. })
    }
}

#[derive(Default)]
struct Accumulator {
    listings: Vec<CanonicalListing>,
    pages_fetched: u32,
    failed_pages: Vec<u32>,
}

impl Accumulator {
    fn absorb(mut self, page: PageResult) -> Self {
        self.pages_fetched += 1;
        self.listings.extend(page.listings);
        self
    }

    fn record_failure(mut self, page: u32) -> Self {
        self.failed_pages.push(page);
        self
    }

    fn finish(self, end: RunEnd) -> RunReport {
        RunReport {
            listings: self.listings,
            pages_fetched: self.pages_fetched,
            failed_pages: self.failed_pages,
            end,
        }
    }
}

/// Walks pages 1..=ceiling from `source` and concatenates their listings.
///
/// Raising `stop` abandons the pause or fetch in flight and ends the run as
/// [`RunEnd::Interrupted`]. A dropped sender never stops the run. A run that
/// ends early for any reason still returns what was collected so far.
pub async fn aggregate<S: PageSource>(
    source: &S,
    options: &RunOptions,
    mut stop: watch::Receiver<bool>,
) -> RunReport {
    let mut paginator = Paginator::new(options.max_pages);
    let mut acc = Accumulator::default();
    let mut first = true;

    let end = loop {
        let page = paginator.page();

        if !first {
            tokio::select! {
                () = tokio::time::sleep(options.delay) => {}
                () = stop_requested(&mut stop) => {
                    tracing::warn!(page, "run interrupted during delay");
                    break RunEnd::Interrupted { next_page: page };
                }
            }
        }
        first = false;

        if *stop.borrow() {
            tracing::warn!(page, "run interrupted");
            break RunEnd::Interrupted { next_page: page };
        }

        let fetched = tokio::select! {
            biased;
            result = source.fetch_page(page) => result,
            () = stop_requested(&mut stop) => {
                tracing::warn!(page, "run interrupted while fetching");
                break RunEnd::Interrupted { next_page: page };
            }
        };

        match fetched {
            Ok(result) => {
                let step = paginator.observe(
                    result.listings.len(),
                    result.has_next,
                    result.total_pages,
                );
                acc = acc.absorb(result);
                tracing::info!(page, collected = acc.listings.len(), "page aggregated");
                if let Step::Stop(reason) = step {
                    break RunEnd::Paginated(reason);
                }
            }
            Err(error) => {
                tracing::warn!(
                    page,
                    error = %error,
                    policy = %options.on_page_error,
                    "page failed"
                );
                acc = acc.record_failure(page);
                match options.on_page_error {
                    PageErrorPolicy::Halt => {
                        break RunEnd::PageFailed {
                            page,
                            error: error.to_string(),
                        };
                    }
                    PageErrorPolicy::Skip => {
                        if let Step::Stop(reason) = paginator.skip() {
                            break RunEnd::Paginated(reason);
                        }
                    }
                }
            }
        }
    };

    let report = acc.finish(end);
    tracing::info!(
        pages_fetched = report.pages_fetched,
        failed = report.failed_pages.len(),
        listings = report.listings.len(),
        end = %report.end,
        "aggregation finished"
    );
    report
}

/// Resolves once `stop` reads `true`. Pends forever if the sender is gone.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    if stop.wait_for(|raised| *raised).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
