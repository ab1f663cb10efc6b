use crate::models::ScrapeOutcome;
use crate::scrapers::types::ScrapeConfig;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all listing sources.
/// Adding a site means implementing this and registering it under a slug.
///
/// Page and card failures belong in the returned outcome; an `Err` means the
/// whole source failed and is recorded by the orchestrator.
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Walk the source's result pages
    async fn scrape(&self, config: &ScrapeConfig) -> Result<ScrapeOutcome>;

    /// Registry key, e.g. `ikman`
    fn slug(&self) -> &'static str;

    /// Human readable site name, e.g. `ikman.lk`
    fn source_name(&self) -> &'static str;
}
