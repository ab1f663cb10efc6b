//! Static slug → adapter table.

use crate::error::PipelineError;
use crate::scrapers::fetch::PageFetcher;
use crate::scrapers::site::SiteScraper;
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::{house, ikman, lpw};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Slugs that sources may be configured with but have no adapter yet
pub const ROUTED_WITHOUT_ADAPTER: &[&str] = &["hitad", "ceylon"];

enum Route {
    Ready(Arc<dyn ScraperTrait>),
    Missing,
}

/// Registry to resolve slugs to scrapers
pub struct ScraperRegistry {
    routes: HashMap<String, Route>,
}

impl ScraperRegistry {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// The built-in sources, all fetching through `fetcher`.
    pub fn standard(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let mut registry = Self::new();
        for def in [&ikman::DEFINITION, &lpw::DEFINITION, &house::DEFINITION] {
            registry.register(Arc::new(SiteScraper::new(def, fetcher.clone())?));
        }
        for slug in ROUTED_WITHOUT_ADAPTER {
            registry.route_missing(slug);
        }
        Ok(registry)
    }

    pub fn register(&mut self, scraper: Arc<dyn ScraperTrait>) {
        self.routes
            .insert(scraper.slug().to_string(), Route::Ready(scraper));
    }

    pub fn route_missing(&mut self, slug: &str) {
        self.routes.insert(slug.to_string(), Route::Missing);
    }

    pub fn resolve(&self, slug: &str) -> Result<Arc<dyn ScraperTrait>, PipelineError> {
        match self.routes.get(slug) {
            Some(Route::Ready(scraper)) => Ok(scraper.clone()),
            Some(Route::Missing) => Err(PipelineError::ModuleNotFound {
                slug: slug.to_string(),
            }),
            None => Err(PipelineError::UnknownSlug {
                slug: slug.to_string(),
            }),
        }
    }

    /// Slugs with a working adapter, sorted
    pub fn available(&self) -> Vec<&str> {
        let mut slugs: Vec<_> = self
            .routes
            .iter()
            .filter(|(_, route)| matches!(route, Route::Ready(_)))
            .map(|(slug, _)| slug.as_str())
            .collect();
        slugs.sort_unstable();
        slugs
    }
}

impl Default for ScraperRegistry {
    fn default() -> Self {
        Self::new()
    }
}
