//! Command-line arguments.

use crate::scrapers::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use clap::Parser;
use std::path::PathBuf;

/// Scrape rental listings from the configured sources.
///
/// The run request is read as JSON, e.g.
/// `{"sources":[{"slug":"ikman","config":{"maxPages":2}}],"type":"full"}`,
/// and the result document is written as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Run request file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Result file (writes stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write every combined listing to its own file in this directory
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCRAPE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every page request
    #[arg(long, env = "SCRAPE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}
