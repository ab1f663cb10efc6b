mod cli;
mod dedup;
mod error;
mod location;
mod models;
mod orchestrator;
mod pii;
mod scrapers;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use models::{Listing, RunOutput, RunRequest};
use orchestrator::Orchestrator;
use scrapers::{FetchSettings, HttpFetcher, ScraperRegistry};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout is reserved for the result document
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    info!("🏠 Rental Scout");

    let input = read_input(args.input.as_deref()).await?;
    let request = match RunRequest::from_json(&input) {
        Ok(request) => request,
        Err(fatal) => {
            error!(error = %fatal.error, "Rejected run request");
            write_output(args.output.as_deref(), &serde_json::to_string_pretty(&fatal)?).await?;
            std::process::exit(1);
        }
    };

    let settings = FetchSettings {
        timeout: Duration::from_secs(args.timeout_secs),
        user_agent: args.user_agent.clone(),
    };
    let fetcher = Arc::new(HttpFetcher::new(&settings)?);
    let registry = ScraperRegistry::standard(fetcher)?;
    info!(available = ?registry.available(), "Registered scrapers");

    let requested = request.sources.len();
    let output = Orchestrator::new(Arc::new(registry)).run(request).await;
    log_summary(&output, requested);

    let json = serde_json::to_string_pretty(&output)?;
    write_output(args.output.as_deref(), &json).await?;

    if let Some(dir) = args.raw_dir.as_deref() {
        write_raw_listings(dir, &output.combined.listings).await?;
    }

    Ok(())
}

async fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    let input = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read run request from {}", path.display()))?,
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read run request from stdin")?;
            input
        }
    };

    // An empty request is an empty run
    if input.trim().is_empty() {
        return Ok("{}".to_string());
    }
    Ok(input)
}

async fn write_output(path: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            info!("💾 Saved results to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn write_raw_listings(dir: &Path, listings: &[Listing]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    for (name, listing) in raw_file_names(listings).into_iter().zip(listings) {
        tokio::fs::write(dir.join(name), serde_json::to_string_pretty(listing)?).await?;
    }

    info!("💾 Saved {} individual listing files to {}", listings.len(), dir.display());
    Ok(())
}

/// `{slug}_{sourceId}.json`, with the listing index appended when two
/// listings share a slug and id.
fn raw_file_names(listings: &[Listing]) -> Vec<String> {
    let mut used = HashSet::new();
    listings
        .iter()
        .enumerate()
        .map(|(idx, listing)| {
            let slug = listing.source_slug.as_deref().unwrap_or("unknown");
            let id = if listing.source_id.is_empty() {
                format!("{idx}")
            } else {
                listing.source_id.replace(['/', '\\'], "_")
            };
            let mut name = format!("{slug}_{id}.json");
            if !used.insert(name.clone()) {
                name = format!("{slug}_{id}_{idx}.json");
                used.insert(name.clone());
            }
            name
        })
        .collect()
}

fn log_summary(output: &RunOutput, requested: usize) {
    let summary = output.summary(requested);
    info!(
        requested = summary.requested,
        failed_sources = summary.failed_sources,
        listings = summary.listings,
        duplicates_removed = summary.duplicates_removed,
        pii_flagged = summary.pii_flagged,
        errors = summary.errors,
        "✅ Scrape run complete"
    );
}
