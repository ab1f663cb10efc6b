pub mod extract;
pub mod fetch;
pub mod house;
pub mod ikman;
pub mod lpw;
pub mod registry;
pub mod site;
pub mod traits;
pub mod types;

pub use fetch::{FetchSettings, HttpFetcher};
pub use registry::ScraperRegistry;
pub use traits::ScraperTrait;
pub use types::ScrapeConfig;
