//! Cross-source duplicate removal keyed on `sourceUrl`.

use crate::models::Listing;
use std::collections::HashSet;

/// Keep the first listing for every non-empty `source_url`, in input order.
/// Listings without a URL are always kept. Returns the survivors and how
/// many were dropped.
pub fn dedupe(listings: Vec<Listing>) -> (Vec<Listing>, usize) {
    let original = listings.len();
    let mut seen: HashSet<String> = HashSet::new();

    let unique: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| listing.source_url.is_empty() || seen.insert(listing.source_url.clone()))
        .collect();

    let removed = original - unique.len();
    (unique, removed)
}
