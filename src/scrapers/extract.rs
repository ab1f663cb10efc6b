//! Extraction heuristics shared by every adapter.
//!
//! Adapters only decide where on the page the raw strings live; turning
//! those strings into a [`Listing`] happens here so that every source
//! produces the same record shape.

use crate::location;
use crate::models::{Furnished, Listing, Location, PropertyType};
use crate::pii;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Image URLs containing this marker are stock placeholders, not photos.
pub const PLACEHOLDER_MARKER: &str = "placeholder";

static BEDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:bed|br)").expect("beds pattern"));
static BATHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*bath").expect("baths pattern"));
static SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:sq|perch)").expect("size pattern"));

/// Title keywords in priority order; first hit decides the type.
static TYPE_KEYWORDS: &[(&str, PropertyType)] = &[
    ("house", PropertyType::House),
    ("apartment", PropertyType::Apartment),
    ("flat", PropertyType::Apartment),
    ("annex", PropertyType::Annex),
    ("room", PropertyType::BoardingRoom),
    ("boarding", PropertyType::BoardingRoom),
];

/// Strings lifted off one result card, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCard {
    pub title: String,
    pub href: Option<String>,
    pub price_text: String,
    pub raw_location: String,
    pub description: String,
    pub image_srcs: Vec<String>,
}

/// Keep digits only; anything unparsable is 0.
pub fn parse_price(text: &str) -> u64 {
    text.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn first_number(regex: &Regex, text: &str) -> u32 {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn extract_beds(text: &str) -> u32 {
    first_number(&BEDS, text)
}

pub fn extract_baths(text: &str) -> u32 {
    first_number(&BATHS, text)
}

pub fn extract_size(text: &str) -> u32 {
    first_number(&SIZE, text)
}

pub fn classify_type(title: &str) -> PropertyType {
    let lowered = title.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or_default()
}

/// Town is everything before the first comma.
pub fn town_of(raw_location: &str) -> String {
    raw_location
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

pub fn is_placeholder(image_url: &str) -> bool {
    image_url.to_lowercase().contains(PLACEHOLDER_MARKER)
}

/// Last non-empty path segment, without query or fragment.
pub fn source_id_of(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| !segment.contains(':'))
        .unwrap_or_default()
        .to_string()
}

pub fn absolutize(base: &Url, href: &str) -> Result<String, url::ParseError> {
    base.join(href.trim()).map(String::from)
}

/// Turn a raw card into a listing.
///
/// `Ok(None)` means the card has no title and is skipped without an error.
/// An `Err` is a card-level parse failure carrying a human readable reason.
pub fn normalize(card: RawCard, base: &Url) -> Result<Option<Listing>, String> {
    let title = card.title.trim();
    if title.is_empty() {
        return Ok(None);
    }

    let source_url = match card.href.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
        Some(href) => absolutize(base, href)
            .map_err(|e| format!("Invalid listing link {href:?}: {e}"))?,
        None => String::new(),
    };

    let images = card
        .image_srcs
        .iter()
        .map(|src| src.trim())
        .filter(|src| !src.is_empty() && !is_placeholder(src))
        .find_map(|src| absolutize(base, src).ok())
        .filter(|url| !is_placeholder(url))
        .into_iter()
        .collect();

    let description = card.description.trim();
    let full_text = format!("{title} {description}");
    let (district, province) = location::resolve(&card.raw_location);

    let clean_title = pii::scrub(title);
    let clean_description = pii::scrub(description);
    let mut pii_details = clean_title.kinds;
    pii_details.extend(clean_description.kinds);

    Ok(Some(Listing {
        title: clean_title.text,
        description: clean_description.text,
        price: parse_price(&card.price_text),
        location: Location {
            town: town_of(&card.raw_location),
            district,
            province,
            raw_address: card.raw_location.trim().to_string(),
        },
        beds: extract_beds(&full_text),
        baths: extract_baths(&full_text),
        size: extract_size(&full_text),
        property_type: classify_type(title),
        furnished: Furnished::Unknown,
        images,
        source_id: source_id_of(&source_url),
        source_url,
        pii_detected: !pii_details.is_empty(),
        pii_details,
        source_slug: None,
        scraped_at: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pii::PiiKind;

    fn base() -> Url {
        Url::parse("https://ikman.lk").unwrap()
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("Rs 45,000"), 45000);
        assert_eq!(parse_price("Rs 120,000 /month"), 120000);
        assert_eq!(parse_price("Contact for price"), 0);
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("99999999999999999999999999"), 0);
    }

    #[test]
    fn test_room_counts_and_size() {
        let text = "Modern 3 Bedroom house with 2 bathrooms on 10 perches";
        assert_eq!(extract_beds(text), 3);
        assert_eq!(extract_baths(text), 2);
        assert_eq!(extract_size(text), 10);

        assert_eq!(extract_beds("2BR flat"), 2);
        assert_eq!(extract_size("1200 sqft apartment"), 1200);
        assert_eq!(extract_size("950 sq.ft"), 950);
        assert_eq!(extract_beds("Annex for rent"), 0);
    }

    #[test]
    fn test_first_match_is_used() {
        assert_eq!(extract_beds("4 bed house, 1 bed annex"), 4);
    }

    #[test]
    fn test_classify_type_priority() {
        assert_eq!(classify_type("House with annex"), PropertyType::House);
        assert_eq!(classify_type("Luxury Apartment"), PropertyType::Apartment);
        assert_eq!(classify_type("Flat near campus"), PropertyType::Apartment);
        assert_eq!(classify_type("Annex for couple"), PropertyType::Annex);
        assert_eq!(classify_type("Boarding for girls"), PropertyType::BoardingRoom);
        assert_eq!(classify_type("Room for rent"), PropertyType::BoardingRoom);
        assert_eq!(classify_type("Land for lease"), PropertyType::Unknown);
    }

    #[test]
    fn test_town_and_source_id() {
        assert_eq!(town_of("Nugegoda, Colombo"), "Nugegoda");
        assert_eq!(town_of("Kandy"), "Kandy");
        assert_eq!(town_of(""), "");

        assert_eq!(source_id_of("https://ikman.lk/en/ad/house-for-rent-123?slot=1"), "house-for-rent-123");
        assert_eq!(source_id_of("https://www.house.lk/rent/listing/987/"), "987");
        assert_eq!(source_id_of(""), "");
    }

    #[test]
    fn test_normalize_full_card() {
        let card = RawCard {
            title: "  3 bedroom house for rent ".to_string(),
            href: Some("/en/ad/3-bedroom-house-nugegoda".to_string()),
            price_text: "Rs 45,000".to_string(),
            raw_location: "Nugegoda, Colombo".to_string(),
            description: "2 bathrooms, call me at 0771234567".to_string(),
            image_srcs: vec![
                "https://i.ikman-st.com/placeholder.png".to_string(),
                "https://i.ikman-st.com/photo1.jpg".to_string(),
            ],
        };

        let listing = normalize(card, &base()).unwrap().unwrap();
        assert_eq!(listing.title, "3 bedroom house for rent");
        assert_eq!(listing.description, "2 bathrooms, [REDACTED]");
        assert_eq!(listing.price, 45000);
        assert_eq!(listing.location.town, "Nugegoda");
        assert_eq!(listing.location.district, "Colombo");
        assert_eq!(listing.location.province, "Western");
        assert_eq!(listing.location.raw_address, "Nugegoda, Colombo");
        assert_eq!(listing.beds, 3);
        assert_eq!(listing.baths, 2);
        assert_eq!(listing.size, 0);
        assert_eq!(listing.property_type, PropertyType::House);
        assert_eq!(listing.furnished, Furnished::Unknown);
        assert_eq!(listing.images, vec!["https://i.ikman-st.com/photo1.jpg"]);
        assert_eq!(listing.source_url, "https://ikman.lk/en/ad/3-bedroom-house-nugegoda");
        assert_eq!(listing.source_id, "3-bedroom-house-nugegoda");
        assert!(listing.pii_detected);
        assert!(listing.pii_details.contains(&PiiKind::Whatsapp));
        assert_eq!(listing.source_slug, None);
    }

    #[test]
    fn test_untitled_card_is_skipped() {
        let card = RawCard {
            title: "   ".to_string(),
            price_text: "Rs 10,000".to_string(),
            ..Default::default()
        };
        assert_eq!(normalize(card, &base()).unwrap(), None);
    }

    #[test]
    fn test_only_placeholder_images() {
        let card = RawCard {
            title: "Room".to_string(),
            image_srcs: vec!["/static/img/PlaceHolder.svg".to_string()],
            ..Default::default()
        };
        let listing = normalize(card, &base()).unwrap().unwrap();
        assert!(listing.images.is_empty());
        assert_eq!(listing.source_url, "");
        assert_eq!(listing.source_id, "");
    }

    #[test]
    fn test_bad_link_is_a_card_error() {
        let card = RawCard {
            title: "Annex".to_string(),
            href: Some("http://[broken".to_string()),
            ..Default::default()
        };
        let err = normalize(card, &base()).unwrap_err();
        assert!(err.starts_with("Invalid listing link"));
    }
}
