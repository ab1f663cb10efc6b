//! Generic paged-search adapter driven by a per-site [`SiteDefinition`].
//!
//! A site only contributes data: where its search pages live and which CSS
//! selectors find cards and fields on them. The page loop, failure isolation
//! and normalization are the same for every source.

use crate::error::PipelineError;
use crate::models::{Listing, ScrapeOutcome};
use crate::scrapers::extract::{self, RawCard};
use crate::scrapers::fetch::PageFetcher;
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::ScrapeConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Where the detail link of a card is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// The card itself when it is an anchor, else its first descendant anchor
    CardOrAnchor,
    /// The element matched by the title selector
    TitleAnchor,
    /// First descendant matching the link selector
    Descendant,
}

/// Static description of one source
#[derive(Debug, Clone, Copy)]
pub struct SiteDefinition {
    pub slug: &'static str,
    pub source_name: &'static str,
    pub base_url: &'static str,
    /// Search URL when no location filter is given
    pub search_url: &'static str,
    /// Search URL with a `{location}` placeholder
    pub location_url: &'static str,
    pub page_param: &'static str,
    pub price_min_param: &'static str,
    pub price_max_param: &'static str,
    /// Card selectors, most specific first
    pub card_cascade: &'static [&'static str],
    pub title: &'static str,
    pub link: LinkSource,
    pub link_selector: &'static str,
    pub price: &'static str,
    pub location: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

impl SiteDefinition {
    /// Search page URL for `page` (1-based).
    pub fn page_url(&self, page: u32, config: &ScrapeConfig) -> Result<Url, url::ParseError> {
        let mut url = match config.location() {
            Some(location) => {
                let slug = location.to_lowercase().replace(' ', "-");
                Url::parse(&self.location_url.replace("{location}", &slug))?
            }
            None => Url::parse(self.search_url)?,
        };

        let mut params: Vec<(&str, String)> = Vec::new();
        if page > 1 {
            params.push((self.page_param, page.to_string()));
        }
        if let Some(min) = config.price_min() {
            params.push((self.price_min_param, min.to_string()));
        }
        if let Some(max) = config.price_max() {
            params.push((self.price_max_param, max.to_string()));
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }
}

/// A [`SiteDefinition`] with its selectors parsed
pub struct SiteLayout {
    pub def: &'static SiteDefinition,
    base: Url,
    cascade: Vec<Selector>,
    title: Selector,
    link: Selector,
    price: Selector,
    location: Selector,
    description: Selector,
    image: Selector,
}

fn compile(slug: &str, css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("{slug}: invalid selector {css:?}: {e}"))
}

impl SiteLayout {
    pub fn new(def: &'static SiteDefinition) -> Result<Self> {
        let slug = def.slug;
        Ok(Self {
            def,
            base: Url::parse(def.base_url)
                .with_context(|| format!("{slug}: invalid base URL {}", def.base_url))?,
            cascade: def
                .card_cascade
                .iter()
                .map(|css| compile(slug, css))
                .collect::<Result<_>>()?,
            title: compile(slug, def.title)?,
            link: compile(slug, def.link_selector)?,
            price: compile(slug, def.price)?,
            location: compile(slug, def.location)?,
            description: compile(slug, def.description)?,
            image: compile(slug, def.image)?,
        })
    }

    /// Try each card strategy in order until one finds something.
    pub fn locate_cards<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for (idx, selector) in self.cascade.iter().enumerate() {
            let cards = self.outermost_cards(document.select(selector).collect());
            if !cards.is_empty() {
                debug!(slug = self.def.slug, strategy = idx, count = cards.len(), "Located cards");
                return cards;
            }
        }
        Vec::new()
    }

    /// Generic selectors match wrappers and card internals as well as cards.
    /// A match holding two or more titled matches is a container and is
    /// dropped; a match inside a remaining card is part of that card.
    fn outermost_cards<'a>(&self, matched: Vec<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
        let ids: HashSet<_> = matched.iter().map(|el| el.id()).collect();

        let mut titled_inside: HashMap<_, usize> = HashMap::new();
        for el in matched.iter().filter(|el| el.select(&self.title).next().is_some()) {
            for ancestor in el.ancestors().filter(|a| ids.contains(&a.id())) {
                *titled_inside.entry(ancestor.id()).or_default() += 1;
            }
        }
        let card_ids: HashSet<_> = ids
            .iter()
            .filter(|id| titled_inside.get(*id).copied().unwrap_or(0) < 2)
            .copied()
            .collect();

        matched
            .into_iter()
            .filter(|el| card_ids.contains(&el.id()))
            .filter(|el| !el.ancestors().any(|a| card_ids.contains(&a.id())))
            .collect()
    }

    pub fn read_card(&self, card: ElementRef<'_>) -> RawCard {
        let title_el = card.select(&self.title).next();

        let link_el = match self.def.link {
            LinkSource::CardOrAnchor if card.value().name() == "a" => Some(card),
            LinkSource::CardOrAnchor | LinkSource::Descendant => card.select(&self.link).next(),
            LinkSource::TitleAnchor => title_el,
        };

        RawCard {
            title: title_el.map(text_of).unwrap_or_default(),
            href: link_el
                .and_then(|el| el.value().attr("href"))
                .map(str::to_string),
            price_text: first_text(card, &self.price),
            raw_location: first_text(card, &self.location),
            description: first_text(card, &self.description),
            image_srcs: card
                .select(&self.image)
                .filter_map(|img| img.value().attr("src"))
                .map(str::to_string)
                .collect(),
        }
    }

    /// Parse one fetched page into listings and card-level errors.
    pub fn parse_page(&self, html: &str, page: u32) -> PageResult {
        let document = Html::parse_document(html);
        let cards = self.locate_cards(&document);

        let mut result = PageResult {
            cards: cards.len(),
            ..Default::default()
        };

        for (idx, card) in cards.into_iter().enumerate() {
            match extract::normalize(self.read_card(card), &self.base) {
                Ok(Some(listing)) => result.listings.push(listing),
                Ok(None) => debug!(slug = self.def.slug, page, card = idx, "Skipped card without title"),
                Err(reason) => {
                    warn!(slug = self.def.slug, page, card = idx, %reason, "Card extraction failed");
                    result.errors.push(PipelineError::Parse { page, reason });
                }
            }
        }

        result
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector).next().map(text_of).unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct PageResult {
    pub cards: usize,
    pub listings: Vec<Listing>,
    pub errors: Vec<PipelineError>,
}

/// Adapter for any site described by a [`SiteDefinition`]
pub struct SiteScraper {
    layout: SiteLayout,
    fetcher: Arc<dyn PageFetcher>,
}

impl SiteScraper {
    pub fn new(def: &'static SiteDefinition, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            layout: SiteLayout::new(def)?,
            fetcher,
        })
    }

    fn record(&self, outcome: &mut ScrapeOutcome, err: PipelineError) {
        outcome.errors.push(err.to_record(self.layout.def.slug));
        outcome.stats.errors += 1;
    }
}

#[async_trait]
impl ScraperTrait for SiteScraper {
    async fn scrape(&self, config: &ScrapeConfig) -> Result<ScrapeOutcome> {
        let def = self.layout.def;
        info!(slug = def.slug, max_pages = config.max_pages, location = ?config.location(), "Starting scrape");

        let mut outcome = ScrapeOutcome {
            source: def.source_name.to_string(),
            ..Default::default()
        };

        for page in 1..=config.max_pages {
            let url = match def.page_url(page, config) {
                Ok(url) => url,
                Err(e) => {
                    self.record(&mut outcome, PipelineError::Transport { page, reason: format!("invalid page URL: {e}") });
                    continue;
                }
            };

            tokio::time::sleep(Duration::from_millis(config.rate_limit_ms)).await;

            let html = match self.fetcher.fetch(url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(slug = def.slug, page, %url, error = %e, "Page fetch failed");
                    self.record(&mut outcome, PipelineError::Transport { page, reason: e.to_string() });
                    continue;
                }
            };
            outcome.stats.pages_scraped += 1;

            let parsed = self.layout.parse_page(&html, page);
            info!(slug = def.slug, page, cards = parsed.cards, listings = parsed.listings.len(), "Parsed page");

            outcome.stats.total_found += parsed.listings.len() as u32;
            outcome.listings.extend(parsed.listings);
            for err in parsed.errors {
                self.record(&mut outcome, err);
            }
        }

        info!(
            slug = def.slug,
            pages = outcome.stats.pages_scraped,
            found = outcome.stats.total_found,
            errors = outcome.stats.errors,
            "Finished scrape"
        );
        Ok(outcome)
    }

    fn slug(&self) -> &'static str {
        self.layout.def.slug
    }

    fn source_name(&self) -> &'static str {
        self.layout.def.source_name
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;

    const TEST_DEF: SiteDefinition = SiteDefinition {
        slug: "test",
        source_name: "test.lk",
        base_url: "https://test.lk",
        search_url: "https://test.lk/rent?type=rent",
        location_url: "https://test.lk/{location}/rent?type=rent",
        page_param: "page",
        price_min_param: "price_min",
        price_max_param: "price_max",
        card_cascade: &[".card", "li.item"],
        title: "h2",
        link: LinkSource::Descendant,
        link_selector: "a[href]",
        price: ".price",
        location: ".location",
        description: "p",
        image: "img[src]",
    };

    static TEST_SITE: SiteDefinition = TEST_DEF;

    fn config(max_pages: u32) -> ScrapeConfig {
        ScrapeConfig {
            max_pages,
            rate_limit_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_url_variants() {
        let mut cfg = config(3);
        assert_eq!(TEST_SITE.page_url(1, &cfg).unwrap().as_str(), "https://test.lk/rent?type=rent");
        assert_eq!(TEST_SITE.page_url(2, &cfg).unwrap().as_str(), "https://test.lk/rent?type=rent&page=2");

        cfg.location = Some("Nuwara Eliya".to_string());
        cfg.price_min = Some(20000);
        cfg.price_max = Some(0);
        assert_eq!(
            TEST_SITE.page_url(3, &cfg).unwrap().as_str(),
            "https://test.lk/nuwara-eliya/rent?type=rent&page=3&price_min=20000"
        );
    }

    #[test]
    fn test_cascade_falls_back() {
        let layout = SiteLayout::new(&TEST_SITE).unwrap();
        let html = r#"<ul><li class="item"><h2>Annex</h2></li><li class="item"><h2>Room</h2></li></ul>"#;
        let document = Html::parse_document(html);
        assert_eq!(layout.locate_cards(&document).len(), 2);

        let html = r#"<div class="card"><h2>House</h2></div><li class="item"><h2>Room</h2></li>"#;
        let document = Html::parse_document(html);
        assert_eq!(layout.locate_cards(&document).len(), 1);

        let document = Html::parse_document("<p>No results</p>");
        assert!(layout.locate_cards(&document).is_empty());
    }

    #[test]
    fn test_nested_matches_collapse_to_outer_card() {
        let layout = SiteLayout::new(&TEST_SITE).unwrap();
        let html = r#"<div class="card"><div class="card"><h2>Inner</h2></div></div><div class="card"><h2>Other</h2></div>"#;
        let document = Html::parse_document(html);
        assert_eq!(layout.locate_cards(&document).len(), 2);

        let html = r#"<div class="card grid"><div class="card"><h2>A</h2></div><div class="card"><h2>B</h2></div></div>"#;
        let document = Html::parse_document(html);
        let cards = layout.locate_cards(&document);
        assert_eq!(cards.len(), 2);
        assert_eq!(layout.read_card(cards[1]).title, "B");
    }

    #[test]
    fn test_invalid_selector_fails_construction() {
        static BROKEN: SiteDefinition = SiteDefinition {
            card_cascade: &["div[[["],
            ..TEST_DEF
        };
        assert!(SiteLayout::new(&BROKEN).is_err());
    }

    #[tokio::test]
    async fn test_page_and_card_isolation() {
        let page1 = r#"
            <div class="card"><h2>2 bedroom house</h2><a href="/ad/one">x</a>
                <span class="price">Rs 30,000</span><span class="location">Kandy</span></div>
            <div class="card"><a href="/ad/untitled">x</a></div>
            <div class="card"><h2>Broken annex</h2><a href="http://[bad">x</a></div>
            <div class="card"><h2>Room near campus</h2><a href="/ad/two">x</a></div>
        "#;
        let page3 = r#"<div class="card"><h2>Flat</h2><a href="/ad/three">x</a></div>"#;

        let fetcher = StaticFetcher::default()
            .with_page("https://test.lk/rent?type=rent", page1)
            .with_page("https://test.lk/rent?type=rent&page=3", page3);
        let fetcher = Arc::new(fetcher);
        let scraper = SiteScraper::new(&TEST_SITE, fetcher.clone()).unwrap();

        let outcome = scraper.scrape(&config(3)).await.unwrap();

        let titles: Vec<_> = outcome.listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["2 bedroom house", "Room near campus", "Flat"]);
        assert_eq!(outcome.stats.pages_scraped, 2);
        assert_eq!(outcome.stats.total_found, 3);
        assert_eq!(outcome.stats.errors, 2);
        assert_eq!(outcome.source, "test.lk");

        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].page, Some(1));
        assert!(outcome.errors[0].message.starts_with("Invalid listing link"));
        assert_eq!(outcome.errors[1].page, Some(2));
        assert_eq!(outcome.errors[1].message, "Failed to fetch page 2: HTTP 404 Not Found");
        assert!(outcome.errors.iter().all(|e| e.source == "test"));

        assert_eq!(fetcher.requested.lock().unwrap().len(), 3);
        assert!(outcome.listings.iter().all(|l| !l.title.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_before_every_page() {
        let fetcher = Arc::new(StaticFetcher::default());
        let scraper = SiteScraper::new(&TEST_SITE, fetcher.clone()).unwrap();
        let cfg = ScrapeConfig {
            max_pages: 3,
            rate_limit_ms: 2000,
            ..Default::default()
        };

        let started = tokio::time::Instant::now();
        let outcome = scraper.scrape(&cfg).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(3 * 2000));
        assert_eq!(outcome.stats.errors, 3);
        assert_eq!(fetcher.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_timed_out_page_is_skipped() {
        let page2 = r#"<div class="card"><h2>Annex</h2><a href="/ad/annex">x</a></div>"#;
        let fetcher = StaticFetcher::default()
            .with_timeout("https://test.lk/rent?type=rent")
            .with_page("https://test.lk/rent?type=rent&page=2", page2);
        let scraper = SiteScraper::new(&TEST_SITE, Arc::new(fetcher)).unwrap();

        let outcome = scraper.scrape(&config(2)).await.unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].page, Some(1));
        assert_eq!(outcome.errors[0].message, "Failed to fetch page 1: request timed out");
        assert_eq!(outcome.stats.pages_scraped, 1);
        assert_eq!(outcome.listings.len(), 1);
        assert_eq!(outcome.listings[0].title, "Annex");
    }

    #[tokio::test]
    async fn test_zero_pages_does_nothing() {
        let fetcher = Arc::new(StaticFetcher::default());
        let scraper = SiteScraper::new(&TEST_SITE, fetcher.clone()).unwrap();
        let outcome = scraper.scrape(&config(0)).await.unwrap();
        assert!(outcome.listings.is_empty());
        assert_eq!(outcome.stats, Default::default());
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }
}
