//! Duplicate removal for aggregated listings.

use std::collections::HashSet;

use balad_core::CanonicalListing;

/// Returns a new collection keeping the first listing for each
/// `(name, address)` pair, in original order.
///
/// Keys are compared exactly as stored. The number of dropped listings is
/// logged.
#[must_use]
pub fn dedup_listings(listings: &[CanonicalListing]) -> Vec<CanonicalListing> {
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(listings.len());
    let unique: Vec<CanonicalListing> = listings
        .iter()
        .filter(|l| seen.insert((l.name.as_str(), l.address.as_str())))
        .cloned()
        .collect();

    let removed = listings.len() - unique.len();
    if removed > 0 {
        tracing::info!(removed, kept = unique.len(), "removed duplicate listings");
    }
    unique
}
