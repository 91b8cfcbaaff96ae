use std::future::Future;

use crate::error::AppError;
use crate::models::ListingRecord;
use crate::trend::TrendPercentages;

/// Fetches raw page content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Walks structured page content and assembles current-listing records.
///
/// Implementations are pure over their input: a block that cannot yield a
/// valid rate is dropped, never defaulted.
pub trait ListingExtractor: Send + Sync + Clone {
    fn extract(&self, page_content: &str, locality_hint: &str) -> Vec<ListingRecord>;
}

/// What the trend strategy reads off one locality page before back-calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendObservation {
    /// Current rate per sqft, the anchor for back-calculation. Must be
    /// positive; the pipeline ignores a zero-rate observation.
    pub current_rate: u32,
    /// 1/3/5-year appreciation figures, when the page carries them.
    pub percentages: Option<TrendPercentages>,
    /// Rental yield, when the page carries it. Attached to every point of
    /// the locality's exported series.
    pub rental_yield: Option<f64>,
}

/// Pulls a [`TrendObservation`] out of a FAQ-bearing locality page.
///
/// Returns `None` when the page has no usable current rate — an extraction
/// miss, not an error.
pub trait TrendExtractor: Send + Sync + Clone {
    fn extract(&self, page_content: &str) -> Option<TrendObservation>;
}
