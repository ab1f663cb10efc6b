//! Runs the requested sources, isolates their failures and merges results.
//!
//! Each adapter runs in its own task. Tasks are joined in request order and
//! each source's listings and errors are merged only after its task is done,
//! so a failing source never touches what another one produced.

use crate::dedup::dedupe;
use crate::error::PipelineError;
use crate::models::{Combined, RunOutput, RunRequest, ScrapeOutcome, SourceResult};
use crate::scrapers::ScraperRegistry;
use anyhow::Result;
use std::any::Any;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

enum Pending {
    Rejected(PipelineError),
    Running(JoinHandle<Result<ScrapeOutcome>>),
}

pub struct Orchestrator {
    registry: Arc<ScraperRegistry>,
}

impl Orchestrator {
    pub fn new(registry: Arc<ScraperRegistry>) -> Self {
        Self { registry }
    }

    pub async fn run(&self, request: RunRequest) -> RunOutput {
        info!(
            sources = request.sources.len(),
            scrape_type = ?request.scrape_type,
            "Starting scrape run"
        );

        let pending: Vec<(String, Pending)> = request
            .sources
            .into_iter()
            .map(|source| {
                let resolved = self
                    .registry
                    .resolve(&source.slug)
                    .and_then(|scraper| Ok((scraper, source.scrape_config()?)));
                let state = match resolved {
                    Ok((scraper, config)) => {
                        Pending::Running(tokio::spawn(async move { scraper.scrape(&config).await }))
                    }
                    Err(e) => Pending::Rejected(e),
                };
                (source.slug, state)
            })
            .collect();

        let mut output = RunOutput::default();
        let mut all_listings = Vec::new();

        for (slug, state) in pending {
            let outcome = match state {
                Pending::Rejected(e) => {
                    warn!(%slug, error = %e, "Skipping source");
                    output.errors.push(e.to_record(&slug));
                    continue;
                }
                Pending::Running(handle) => match handle.await {
                    Ok(Ok(outcome)) => Ok(outcome),
                    Ok(Err(e)) => Err(format!("{e:#}")),
                    Err(join_err) => Err(join_failure(join_err)),
                },
            };

            match outcome {
                Ok(mut outcome) => {
                    info!(
                        %slug,
                        listings = outcome.listings.len(),
                        errors = outcome.errors.len(),
                        "Source finished"
                    );
                    for listing in &mut outcome.listings {
                        listing.source_slug = Some(slug.clone());
                    }
                    output.results.insert(
                        slug,
                        SourceResult::Completed {
                            stats: outcome.stats,
                            listing_count: outcome.listings.len(),
                            source: outcome.source,
                        },
                    );
                    all_listings.extend(outcome.listings);
                    output.errors.extend(outcome.errors);
                }
                Err(reason) => {
                    error!(%slug, %reason, "Source failed");
                    let err = PipelineError::Adapter { reason: reason.clone() };
                    output.errors.push(err.to_record(&slug));
                    output.results.insert(slug, SourceResult::failed(reason));
                }
            }
        }

        let (listings, duplicates_removed) = dedupe(all_listings);
        output.combined = Combined {
            total_scraped: listings.len(),
            duplicates_removed,
            listings,
        };

        output
    }
}

fn join_failure(err: JoinError) -> String {
    if err.is_panic() {
        format!("adapter panicked: {}", panic_message(err.into_panic()))
    } else {
        err.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
