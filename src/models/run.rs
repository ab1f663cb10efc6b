//! Request and response documents for one orchestrator run.

use super::{Listing, ScrapeError, ScrapeStats};
use crate::error::PipelineError;
use crate::scrapers::types::ScrapeConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeType {
    #[default]
    Full,
    Incremental,
    Recheck,
}

/// One requested source. A missing slug or a bad `config` only fails this
/// source, so both are kept loose until the orchestrator looks at them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRequest {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub config: Value,
}

impl SourceRequest {
    pub fn new(slug: impl Into<String>, config: &ScrapeConfig) -> Self {
        Self {
            slug: slug.into(),
            config: serde_json::to_value(config).unwrap_or_default(),
        }
    }

    /// Typed config; absent or `null` means all defaults
    pub fn scrape_config(&self) -> Result<ScrapeConfig, PipelineError> {
        if self.config.is_null() {
            return Ok(ScrapeConfig::default());
        }
        ScrapeConfig::deserialize(&self.config).map_err(|e| PipelineError::InvalidConfig {
            slug: self.slug.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub sources: Vec<SourceRequest>,
    #[serde(rename = "type", default)]
    pub scrape_type: ScrapeType,
}

impl RunRequest {
    pub fn from_json(input: &str) -> Result<Self, FatalError> {
        serde_json::from_str(input).map_err(|e| FatalError {
            error: format!("Invalid JSON input: {e}"),
        })
    }
}

/// Serializes as `{}`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyStats {}

/// Per-source entry in `results`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SourceResult {
    Completed {
        stats: ScrapeStats,
        #[serde(rename = "listingCount")]
        listing_count: usize,
        source: String,
    },
    Failed {
        stats: EmptyStats,
        #[serde(rename = "listingCount")]
        listing_count: usize,
        error: String,
    },
}

impl SourceResult {
    pub fn failed(error: impl Into<String>) -> Self {
        SourceResult::Failed {
            stats: EmptyStats {},
            listing_count: 0,
            error: error.into(),
        }
    }

    pub fn listing_count(&self) -> usize {
        match self {
            SourceResult::Completed { listing_count, .. }
            | SourceResult::Failed { listing_count, .. } => *listing_count,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Combined {
    pub listings: Vec<Listing>,
    pub total_scraped: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunOutput {
    pub results: BTreeMap<String, SourceResult>,
    pub combined: Combined,
    pub errors: Vec<ScrapeError>,
}

/// The only failure that aborts a run: input that is not a run request at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FatalError {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: usize,
    pub failed_sources: usize,
    pub listings: usize,
    pub duplicates_removed: usize,
    pub pii_flagged: usize,
    pub errors: usize,
}

impl RunOutput {
    /// `requested` counts every source in the request, including rejected ones.
    pub fn summary(&self, requested: usize) -> RunSummary {
        RunSummary {
            requested,
            failed_sources: self
                .results
                .values()
                .filter(|r| matches!(r, SourceResult::Failed { .. }))
                .count(),
            listings: self.combined.total_scraped,
            duplicates_removed: self.combined.duplicates_removed,
            pii_flagged: self
                .combined
                .listings
                .iter()
                .filter(|l| l.pii_detected)
                .count(),
            errors: self.errors.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_with_defaults() {
        let request = RunRequest::from_json(
            r#"{"sources":[{"slug":"ikman","script":"ikman_scraper.py","config":{"maxPages":2,"rateLimit":500,"location":"Kandy"}},{"slug":"lpw"}],"type":"recheck"}"#,
        )
        .unwrap();

        assert_eq!(request.scrape_type, ScrapeType::Recheck);
        assert_eq!(request.sources.len(), 2);
        let ikman = request.sources[0].scrape_config().unwrap();
        assert_eq!(ikman.max_pages, 2);
        assert_eq!(ikman.rate_limit_ms, 500);
        assert_eq!(ikman.location(), Some("Kandy"));
        let lpw = request.sources[1].scrape_config().unwrap();
        assert_eq!(lpw.max_pages, 3);
        assert_eq!(lpw.rate_limit_ms, 2000);
    }

    #[test]
    fn test_bad_source_entries_are_not_fatal() {
        let request = RunRequest::from_json(
            r#"{"sources":[{"config":{}},{"slug":"ikman","config":{"maxPages":-1}},{"slug":"lpw","config":null}]}"#,
        )
        .unwrap();

        assert_eq!(request.sources.len(), 3);
        assert_eq!(request.sources[0].slug, "");
        assert!(request.sources[0].scrape_config().is_ok());

        let err = request.sources[1].scrape_config().unwrap_err();
        assert!(err.to_string().starts_with("Invalid config for ikman: "));

        assert_eq!(request.sources[2].scrape_config().unwrap(), ScrapeConfig::default());
    }

    #[test]
    fn test_summary_counts_requested_sources() {
        let mut output = RunOutput::default();
        output.results.insert("ikman".to_string(), SourceResult::failed("boom"));
        let summary = output.summary(3);
        assert_eq!(summary.requested, 3);
        assert_eq!(summary.failed_sources, 1);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_empty_object_is_an_empty_run() {
        let request = RunRequest::from_json("{}").unwrap();
        assert!(request.sources.is_empty());
        assert_eq!(request.scrape_type, ScrapeType::Full);
    }

    #[test]
    fn test_malformed_input_is_fatal() {
        let err = RunRequest::from_json("{\"sources\": [").unwrap_err();
        assert!(err.error.starts_with("Invalid JSON input: "));

        let err = RunRequest::from_json(r#"{"sources":"ikman"}"#).unwrap_err();
        assert!(err.error.starts_with("Invalid JSON input: "));
    }

    #[test]
    fn test_failed_result_shape() {
        let value = serde_json::to_value(SourceResult::failed("boom")).unwrap();
        assert_eq!(value, json!({"stats": {}, "listingCount": 0, "error": "boom"}));
    }

    #[test]
    fn test_completed_result_shape() {
        let value = serde_json::to_value(SourceResult::Completed {
            stats: ScrapeStats {
                pages_scraped: 2,
                total_found: 5,
                errors: 1,
            },
            listing_count: 5,
            source: "ikman.lk".to_string(),
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "stats": {"pagesScraped": 2, "totalFound": 5, "errors": 1},
                "listingCount": 5,
                "source": "ikman.lk"
            })
        );
    }
}
