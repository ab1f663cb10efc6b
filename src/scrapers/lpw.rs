//! LankaPropertyWeb rentals.

use crate::scrapers::site::{LinkSource, SiteDefinition};

pub const SLUG: &str = "lpw";

pub static DEFINITION: SiteDefinition = SiteDefinition {
    slug: SLUG,
    source_name: "lankapropertyweb.com",
    base_url: "https://www.lankapropertyweb.com",
    search_url: "https://www.lankapropertyweb.com/rent/houses-for-rent.php",
    location_url: "https://www.lankapropertyweb.com/rent/{location}.php",
    page_param: "page",
    price_min_param: "price_min",
    price_max_param: "price_max",
    card_cascade: &[
        ".property-item, .listing-item, .property-card, .result-item, li.property",
        r#"[class*="property"], [class*="listing"]"#,
    ],
    title: "h2 a, h3 a, .title a, a.property-title",
    link: LinkSource::TitleAnchor,
    link_selector: "a[href]",
    price: r#".price, [class*="price"]"#,
    location: r#".location, [class*="location"], .address"#,
    description: ".description, p, .details",
    image: "img[src]",
};
