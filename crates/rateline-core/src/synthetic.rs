//! Synthetic fallback data: statistically plausible listings and history.
//!
//! Deterministic shape, randomized values. This generator has no external
//! dependencies and never fails — it is the pipeline's guaranteed terminal
//! fallback, and everything it emits is tagged [`Provenance::Synthetic`].

use chrono::{Datelike, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{HistoricalPoint, ListingRecord, Provenance};

/// Society names drawn for synthetic listings.
const SOCIETIES: &[&str] = &[
    "Rustomjee Urbania",
    "Kanakia Paris",
    "Runwal Gardens",
    "Lodha Splendora",
    "Acme Ozone",
    "Evershine Millennium Paradise",
    "Sheth Vasant Oasis",
    "Poonam Sagar",
    "Beverly Park",
    "Golden Nest",
    "Silver Park",
    "Maxus Mall Residency",
    "Haware Citi",
    "Shree Krishna Towers",
    "Sai Sarang",
    "Sheetal Tapovan",
    "Gundecha Valley",
    "Thakur Village",
];

/// Zones drawn for synthetic listings.
const ZONES: &[&str] = &[
    "Mira Road East",
    "Mira Road West",
    "Mira Bhayandar",
    "Kashimira",
];

/// How many generated records get a back-projected history series.
const HISTORY_SUBSET: usize = 10;

/// Zone-conditioned base-rate range, keyed by zone-name substring.
fn rate_range(zone: &str) -> std::ops::RangeInclusive<u32> {
    if zone.contains("East") {
        6500..=9500
    } else if zone.contains("West") {
        7000..=10500
    } else {
        6000..=9000
    }
}

/// Generate `count` synthetic listing records plus a back-projected
/// historical series for the first [`HISTORY_SUBSET`] of them.
pub fn generate_synthetic(count: usize) -> (Vec<ListingRecord>, Vec<HistoricalPoint>) {
    let mut rng = rand::thread_rng();
    let mut listings = Vec::with_capacity(count);

    for _ in 0..count {
        let society = *SOCIETIES.choose(&mut rng).unwrap_or(&SOCIETIES[0]);
        let zone = *ZONES.choose(&mut rng).unwrap_or(&ZONES[0]);
        let rate = rng.gen_range(rate_range(zone));
        let appreciation = (rng.gen_range(15.0..45.0_f64) * 10.0).round() / 10.0;
        let rental_yield = (rng.gen_range(2.5..4.5_f64) * 100.0).round() / 100.0;

        // rate is always positive by construction of the ranges.
        if let Some(rec) = ListingRecord::new(
            society,
            zone,
            "Residential",
            rate,
            Some(appreciation),
            Some(rental_yield),
            Provenance::Synthetic,
        ) {
            listings.push(rec);
        }
    }

    let history = back_project(&listings);
    (listings, history)
}

/// Back-project a 5-year, 6-monthly price series for a subset of records,
/// compounding at a single annual rate derived from each record's 5-year
/// appreciation figure.
fn back_project(listings: &[ListingRecord]) -> Vec<HistoricalPoint> {
    let now = Utc::now();
    let mut history = Vec::new();

    for rec in listings.iter().take(HISTORY_SUBSET) {
        let annual_rate = rec.appreciation_5yr.unwrap_or(0.0) / 100.0 / 5.0;
        let current = f64::from(rec.rate_per_sqft);

        for months_ago in (0..=60).step_by(6) {
            let date = now - Duration::days(months_ago * 30);
            let years_back = months_ago as f64 / 12.0;
            let price = (current / (1.0 + annual_rate).powf(years_back)).round() as u32;
            if price == 0 {
                continue;
            }
            history.push(HistoricalPoint {
                locality: rec.area_name.clone(),
                year: date.year(),
                price_per_sqft: price,
                rental_yield: rec.rental_yield,
                provenance: Provenance::Synthetic,
            });
        }
    }

    history
}
