//! Historical-price back-calculation from percentage-appreciation figures.
//!
//! A percentage here means appreciation *from* the past date *to* the anchor
//! date, so the past price is `current / (1 + pct/100)` and compounding
//! forward from it reproduces the current rate. Negative percentages
//! (depreciation) divide by a value in (0, 1) and correctly inflate the
//! historical price.

use crate::error::AppError;
use crate::models::{HistoricalPoint, Provenance};

/// Appreciation percentages since 1, 3, and 5 years back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPercentages {
    pub p1: f64,
    pub p3: f64,
    pub p5: f64,
}

/// Back-calculate a single past price from the current rate and the
/// appreciation since that date.
///
/// Fails with [`AppError::InvalidAppreciation`] when `pct <= -100`, which
/// would make the denominator non-positive, and when the division rounds
/// the past price down to zero — a history point must carry a positive
/// price.
pub fn back_calculate(current_rate: u32, pct: f64, locality: &str) -> Result<u32, AppError> {
    let denom = 1.0 + pct / 100.0;
    if denom <= 0.0 {
        return Err(AppError::InvalidAppreciation {
            locality: locality.to_string(),
            pct,
        });
    }
    let past = (f64::from(current_rate) / denom).round();
    if past < 1.0 {
        return Err(AppError::InvalidAppreciation {
            locality: locality.to_string(),
            pct,
        });
    }
    Ok(past as u32)
}

/// Derive the four-point trend series for one locality: the anchor year at
/// the current rate, plus anchor−1, anchor−3, and anchor−5 at back-calculated
/// prices. All points are tagged [`Provenance::Live`] and carry the
/// locality's rental yield when one was observed.
///
/// Any pathological percentage (≤ −100%) fails the whole locality; the
/// caller skips its derived points and the run continues.
pub fn derive_trend_points(
    current_rate: u32,
    pcts: TrendPercentages,
    rental_yield: Option<f64>,
    locality: &str,
    anchor_year: i32,
) -> Result<Vec<HistoricalPoint>, AppError> {
    let mut points = vec![HistoricalPoint {
        locality: locality.to_string(),
        year: anchor_year,
        price_per_sqft: current_rate,
        rental_yield,
        provenance: Provenance::Live,
    }];

    for (years_back, pct) in [(1, pcts.p1), (3, pcts.p3), (5, pcts.p5)] {
        let price = back_calculate(current_rate, pct, locality)?;
        points.push(HistoricalPoint {
            locality: locality.to_string(),
            year: anchor_year - years_back,
            price_per_sqft: price,
            rental_yield,
            provenance: Provenance::Live,
        });
    }

    Ok(points)
}
