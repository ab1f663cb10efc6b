//! house.lk rentals.

use crate::scrapers::site::{LinkSource, SiteDefinition};

pub const SLUG: &str = "house";

pub static DEFINITION: SiteDefinition = SiteDefinition {
    slug: SLUG,
    source_name: "house.lk",
    base_url: "https://www.house.lk",
    search_url: "https://www.house.lk/rent",
    location_url: "https://www.house.lk/rent/{location}",
    page_param: "page",
    price_min_param: "price_min",
    price_max_param: "price_max",
    card_cascade: &[
        r#".property-item, .listing-item, .property-card, [class*="property-list"]"#,
        r#"div[class*="listing"], div[class*="property"]"#,
    ],
    title: r#"h2, h3, .title, a[class*="title"]"#,
    link: LinkSource::Descendant,
    link_selector: "a[href]",
    price: r#".price, [class*="price"]"#,
    location: r#".location, [class*="location"], .address"#,
    description: ".description, p",
    image: "img[src]",
};
