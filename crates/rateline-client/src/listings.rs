//! Selector-driven listing extraction over structured page blocks.
//!
//! Walks candidate card blocks and looks up each field through an ordered
//! list of selector candidates, first match wins. Price and area are
//! mandatory: a block that cannot yield both is discarded outright, since
//! it cannot produce a meaningful rate-per-sqft. Blocks shaped as rate
//! cards (a rate string but no price/area pair) are recovered through the
//! text-pattern extractors instead.

use std::sync::LazyLock;

use rateline_core::models::{ListingRecord, Provenance};
use rateline_core::patterns;
use rateline_core::traits::ListingExtractor;
use rateline_core::zones::{DEFAULT_ZONE, determine_zone};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Candidate card blocks, broadest shapes last.
const CARD_SELECTORS: &str = "div.tupleNew, div.srpTuple, article, div.srpWrap, div.card, div.locality";

const TITLE_SELECTORS: &[&str] = &["h2", "div.srpTuple__propertyHeading", "h3", "a.title"];
const PRICE_SELECTORS: &[&str] = &["span.srpTuple__price", "div.price"];
const AREA_SELECTORS: &[&str] = &["span.srpTuple__area", "div.area"];
const TYPE_SELECTORS: &[&str] = &["span.srpTuple__propertyType"];
const BUILDER_SELECTORS: &[&str] = &["div.srpTuple__builderName", "span.developer"];

/// Builders recognizable from a title or card text when no builder field
/// is present.
const KNOWN_BUILDERS: &[&str] = &[
    "Lodha", "Godrej", "Tata", "Oberoi", "Hiranandani", "Runwal", "Kalpataru", "Shapoorji",
    "Mahindra", "Piramal", "Rustomjee", "Sheth", "Wadhwa", "Radius", "Kanakia", "Ajmera",
];

/// Rates outside this band are treated as parse artifacts and the block
/// is rejected as incomplete.
const PLAUSIBLE_RATE: std::ops::RangeInclusive<u32> = 100..=1_000_000;

static NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());
static INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static BHK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*bhk").unwrap());

/// The live listing extraction strategy.
#[derive(Debug, Clone, Default)]
pub struct SelectorListingExtractor;

impl SelectorListingExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ListingExtractor for SelectorListingExtractor {
    fn extract(&self, page_content: &str, locality_hint: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(page_content);
        let card_selector = Selector::parse(CARD_SELECTORS).expect("static selector");

        document
            .select(&card_selector)
            .filter_map(|card| extract_card(card, locality_hint))
            .collect()
    }
}

fn extract_card(card: ElementRef<'_>, locality_hint: &str) -> Option<ListingRecord> {
    let text = card_text(card);

    let price = first_text(card, PRICE_SELECTORS).and_then(|t| parse_price(&t));
    let area = first_text(card, AREA_SELECTORS).and_then(|t| parse_area(&t));

    let (rate, property_type) = match (price, area) {
        (Some(price), Some(area)) => {
            let rate = (price as f64 / f64::from(area)).round() as u32;
            let base = first_text(card, TYPE_SELECTORS).unwrap_or_else(|| "Apartment".to_string());
            let beds = parse_bedrooms(&text).unwrap_or(2);
            (rate, format!("{beds} BHK {base}"))
        }
        // Rate-card shape: no price/area pair, but the block text carries
        // the rate directly.
        _ => (patterns::extract_rate(&text)?, "Residential".to_string()),
    };

    if !PLAUSIBLE_RATE.contains(&rate) {
        return None;
    }

    let area_name = first_text(card, TITLE_SELECTORS)
        .or_else(|| first_text(card, BUILDER_SELECTORS))
        .or_else(|| infer_builder(&text).map(|b| format!("{b} {locality_hint}")))
        .unwrap_or_else(|| format!("Property in {locality_hint}"));
    if area_name.is_empty() || area_name.len() > 100 {
        return None;
    }

    ListingRecord::new(
        &area_name,
        zone_for(&area_name, locality_hint),
        property_type,
        rate,
        patterns::extract_appreciation(&text),
        patterns::extract_rental_yield(&text),
        Provenance::Live,
    )
}

/// Zone from the area name, falling back to the locality hint when the
/// name itself matches nothing.
fn zone_for(area_name: &str, locality_hint: &str) -> &'static str {
    let zone = determine_zone(area_name);
    if zone == DEFAULT_ZONE {
        determine_zone(locality_hint)
    } else {
        zone
    }
}

/// Whitespace-normalized text content of a block.
fn card_text(card: ElementRef<'_>) -> String {
    card.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First selector candidate with non-empty text wins.
fn first_text(card: ElementRef<'_>, candidates: &[&str]) -> Option<String> {
    for candidate in candidates {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            let text = card_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Parse a price string into rupees.
///
/// Units: `Cr`/`crore` ×10⁷, `Lac`/`lakh` ×10⁵, `k` ×10³. A bare number is
/// conservatively assumed to be quoted in lakhs.
pub fn parse_price(price_text: &str) -> Option<u64> {
    let cleaned = price_text
        .replace('₹', "")
        .replace(',', "")
        .trim()
        .to_lowercase();
    let number: f64 = NUM_RE.find(&cleaned)?.as_str().parse().ok()?;

    let rupees = if cleaned.contains("cr") {
        number * 10_000_000.0
    } else if cleaned.contains("lac") || cleaned.contains("lakh") {
        number * 100_000.0
    } else if cleaned.contains('k') {
        number * 1_000.0
    } else {
        number * 100_000.0
    };

    if rupees <= 0.0 {
        return None;
    }
    Some(rupees.round() as u64)
}

/// Parse an area string like `850 sq.ft.` into square feet.
pub fn parse_area(area_text: &str) -> Option<u32> {
    let cleaned = area_text.replace(',', "");
    let value: u32 = INT_RE.find(&cleaned)?.as_str().parse().ok()?;
    if value == 0 { None } else { Some(value) }
}

/// Bedroom count from a `N BHK` token.
fn parse_bedrooms(text: &str) -> Option<u32> {
    let caps = BHK_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Recognize a known builder name anywhere in the block text.
fn infer_builder(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    KNOWN_BUILDERS
        .iter()
        .find(|b| lower.contains(&b.to_lowercase()))
        .copied()
}
