//! Failure taxonomy for a scrape run.
//!
//! Every variant is recovered where it happens and ends up as a
//! [`ScrapeError`] entry in the run output.

use crate::models::ScrapeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A result page could not be fetched
    #[error("Failed to fetch page {page}: {reason}")]
    Transport { page: u32, reason: String },

    /// One card on a page could not be turned into a listing
    #[error("{reason}")]
    Parse { page: u32, reason: String },

    #[error("Unknown scraper slug: {slug}")]
    UnknownSlug { slug: String },

    /// Source `config` does not describe a valid search
    #[error("Invalid config for {slug}: {reason}")]
    InvalidConfig { slug: String, reason: String },

    /// Slug is routed but has no adapter behind it
    #[error("Scraper module not found: {slug}")]
    ModuleNotFound { slug: String },

    /// Anything escaping an adapter, including a panic
    #[error("Scraper execution failed: {reason}")]
    Adapter { reason: String },
}

impl PipelineError {
    pub fn page(&self) -> Option<u32> {
        match self {
            PipelineError::Transport { page, .. } | PipelineError::Parse { page, .. } => {
                Some(*page)
            }
            _ => None,
        }
    }

    pub fn to_record(&self, source: &str) -> ScrapeError {
        ScrapeError {
            page: self.page(),
            message: self.to_string(),
            source: source.to_string(),
        }
    }
}
