//! Trend extraction over FAQ-bearing locality pages.
//!
//! The source embeds its history in FAQ prose: a current-rate sentence and
//! a "moved: a % since 1 year …" triple. This strategy reads both through
//! the core pattern extractors; the back-calculation itself stays in the
//! pipeline.

use rateline_core::patterns;
use rateline_core::traits::{TrendExtractor, TrendObservation};

/// The live FAQ-based trend extraction strategy.
#[derive(Debug, Clone, Default)]
pub struct FaqTrendExtractor;

impl FaqTrendExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TrendExtractor for FaqTrendExtractor {
    fn extract(&self, page_content: &str) -> Option<TrendObservation> {
        // Without a positive current rate there is nothing to anchor on; a
        // page quoting a zero rate is as much a miss as one quoting none.
        let current_rate = patterns::extract_faq_rate(page_content)
            .or_else(|| patterns::extract_rate(page_content))
            .filter(|&rate| rate > 0)?;

        Some(TrendObservation {
            current_rate,
            percentages: patterns::extract_trend_percentages(page_content),
            rental_yield: patterns::extract_faq_yield(page_content)
                .or_else(|| patterns::extract_rental_yield(page_content)),
        })
    }
}
