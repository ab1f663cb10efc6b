//! ikman.lk property rentals.

use crate::scrapers::site::{LinkSource, SiteDefinition};

pub const SLUG: &str = "ikman";

pub static DEFINITION: SiteDefinition = SiteDefinition {
    slug: SLUG,
    source_name: "ikman.lk",
    base_url: "https://ikman.lk",
    search_url: "https://ikman.lk/en/ads/sri-lanka/properties?type=rent",
    location_url: "https://ikman.lk/en/ads/{location}/properties?type=rent",
    page_param: "page",
    price_min_param: "price_min",
    price_max_param: "price_max",
    card_cascade: &[
        r#"li[class*="ad-card"], div[class*="ad-card"], a[class*="card"]"#,
        r#"[data-testid="ad-card"], .list--item, .ad-item"#,
        r#"ul li a[href*="/ad/"]"#,
    ],
    title: r#"h2, h3, [class*="title"], [data-testid="title"]"#,
    link: LinkSource::CardOrAnchor,
    link_selector: "a[href]",
    price: r#"[class*="price"], [data-testid="price"]"#,
    location: r#"[class*="location"], [data-testid="location"], [class*="subtitle"]"#,
    description: r#"[class*="description"], p"#,
    image: "img[src]",
};
