//! Turns one fetched listing page into a [`PageResult`]:
//! locate → resolve → normalize.

use balad_core::CanonicalListing;
use serde_json::Value;

use crate::error::ScraperError;
use crate::locate::{locate_structured_data, summarize_attempts, Strategy};
use crate::normalize::normalize_records;
use crate::resolve::{page_count_hint, resolve_items};

/// Outcome of one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// 1-based page ordinal.
    pub page: u32,
    pub listings: Vec<CanonicalListing>,
    /// Upstream total-page hint, when the page carries one.
    pub total_pages: Option<u32>,
    /// Whether more pages are likely to exist.
    pub has_next: bool,
}

/// Parses a listing page's HTML.
///
/// A page whose structured data holds no recognizable records yields an
/// empty `listings` vector, which is a normal end-of-results signal.
///
/// # Errors
///
/// Returns [`ScraperError::NoStructuredData`] when no extraction strategy
/// found a document.
pub fn parse_listing_page(html: &str, page: u32) -> Result<PageResult, ScraperError> {
    let located = locate_structured_data(html).map_err(|attempts| {
        ScraperError::NoStructuredData {
            page,
            detail: summarize_attempts(&attempts),
        }
    })?;
    let strategy = located.strategy;

    let (records, total_pages) = match strategy {
        Strategy::Hydration => (
            resolve_items(&located.document),
            page_count_hint(&located.document),
        ),
        Strategy::LinkedData => match located.document {
            Value::Array(items) => (items, None),
            _ => (Vec::new(), None),
        },
    };

    let listings = normalize_records(&records);
    let has_next = match total_pages {
        Some(total) if total > 1 => page < total,
        _ => true,
    };

    tracing::info!(
        page,
        %strategy,
        records = records.len(),
        listings = listings.len(),
        total_pages,
        "parsed listing page"
    );

    Ok(PageResult {
        page,
        listings,
        total_pages,
        has_next,
    })
}
