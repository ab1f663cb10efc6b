pub mod run;

use crate::pii::PiiKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use run::{Combined, RunOutput, RunRequest, SourceResult};

/// Kind of rental property, guessed from the listing title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PropertyType {
    #[default]
    Unknown,
    House,
    Apartment,
    Annex,
    #[serde(rename = "Boarding Room")]
    BoardingRoom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Furnished {
    #[default]
    Unknown,
    Furnished,
    #[serde(rename = "Semi-Furnished")]
    SemiFurnished,
    Unfurnished,
}

/// Location information for a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub town: String,
    pub district: String,
    pub province: String,
    pub raw_address: String,
}

/// Canonical rental listing, identical in shape whichever site it came from.
///
/// Downstream consumers must treat every field as possibly zero, empty or
/// `Unknown`; only `title` is guaranteed to be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub title: String,
    pub description: String,
    /// Monthly rent, 0 when the price could not be read
    pub price: u64,
    pub location: Location,
    pub beds: u32,
    pub baths: u32,
    pub size: u32,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub furnished: Furnished,
    pub images: Vec<String>,
    pub source_url: String,
    pub source_id: String,
    pub pii_detected: bool,
    pub pii_details: BTreeSet<PiiKind>,
    /// Set by the orchestrator once the adapter has returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_slug: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

/// Per-adapter counters for one run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeStats {
    pub pages_scraped: u32,
    pub total_found: u32,
    pub errors: u32,
}

/// One recoverable failure. `page` is absent for source-level errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapeError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub message: String,
    pub source: String,
}

/// Everything an adapter hands back for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub listings: Vec<Listing>,
    pub stats: ScrapeStats,
    pub errors: Vec<ScrapeError>,
    pub source: String,
}
