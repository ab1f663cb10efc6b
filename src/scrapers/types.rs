use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PAGES: u32 = 3;
pub const DEFAULT_RATE_LIMIT_MS: u64 = 2000;

/// Search parameters for one source in a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeConfig {
    /// Number of result pages to walk, starting at 1
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Town or district to narrow the search to
    #[serde(default)]
    pub location: Option<String>,
    /// Minimum monthly rent
    #[serde(default)]
    pub price_min: Option<u64>,
    /// Maximum monthly rent
    #[serde(default)]
    pub price_max: Option<u64>,
    /// Delay before every page request, in milliseconds
    #[serde(rename = "rateLimit", default = "default_rate_limit")]
    pub rate_limit_ms: u64,
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_rate_limit() -> u64 {
    DEFAULT_RATE_LIMIT_MS
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            location: None,
            price_min: None,
            price_max: None,
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
        }
    }
}

impl ScrapeConfig {
    /// Location filter, ignoring blank values
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Price bounds of 0 mean "no bound"
    pub fn price_min(&self) -> Option<u64> {
        self.price_min.filter(|p| *p > 0)
    }

    pub fn price_max(&self) -> Option<u64> {
        self.price_max.filter(|p| *p > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_absent() {
        let config: ScrapeConfig =
            serde_json::from_str(r#"{"location":"  ","priceMin":0,"priceMax":50000}"#).unwrap();
        assert_eq!(config.location(), None);
        assert_eq!(config.price_min(), None);
        assert_eq!(config.price_max(), Some(50000));
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
    }
}
