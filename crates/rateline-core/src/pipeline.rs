//! The acquisition orchestrator: listings stage, trends stage, merge.
//!
//! Generic over the transport and both extraction strategies via traits,
//! enabling dependency injection and testability without real HTTP calls.
//!
//! Three decision points per run:
//! 1. Live listing count below the sufficiency threshold ⇒ discard all live
//!    listings and substitute the full synthetic output. Never a partial
//!    blend within the stage.
//! 2. Zero live trend points ⇒ substitute synthetic historical output.
//! 3. Merge and hand the provenance-tagged result to the caller.

use std::time::Instant;

use crate::config::PipelineConfig;
use crate::models::{AcquisitionResult, HistoricalPoint, ListingRecord, Provenance};
use crate::synthetic::generate_synthetic;
use crate::traits::{Fetcher, ListingExtractor, TrendExtractor};
use crate::trend::derive_trend_points;

pub struct AcquisitionPipeline<F, L, T>
where
    F: Fetcher,
    L: ListingExtractor,
    T: TrendExtractor,
{
    fetcher: F,
    listing_extractor: L,
    trend_extractor: T,
    config: PipelineConfig,
}

impl<F, L, T> AcquisitionPipeline<F, L, T>
where
    F: Fetcher,
    L: ListingExtractor,
    T: TrendExtractor,
{
    pub fn new(fetcher: F, listing_extractor: L, trend_extractor: T, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            listing_extractor,
            trend_extractor,
            config,
        }
    }

    /// Run both stages under the wall-clock budget and merge the result.
    ///
    /// Never fails: every per-target failure is logged and absorbed, and the
    /// synthetic generator backstops each stage.
    pub async fn run(&self) -> AcquisitionResult {
        let deadline = Instant::now() + self.config.run_budget;

        let live_listings = self.stage_under_budget(deadline, "listings", self.collect_live_listings()).await;
        let listings = self.decide_listings(live_listings.unwrap_or_default());

        let live_points = self.stage_under_budget(deadline, "trends", self.collect_live_trends()).await;
        let history = self.decide_history(live_points.unwrap_or_default());

        tracing::info!(
            listings = listings.len(),
            history_points = history.len(),
            "Acquisition run complete"
        );

        AcquisitionResult { listings, history }
    }

    /// Run one stage with the remaining budget; `None` means the budget
    /// expired before or during the stage.
    async fn stage_under_budget<S, O>(&self, deadline: Instant, stage: &str, fut: S) -> Option<O>
    where
        S: std::future::Future<Output = O>,
    {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::warn!(stage, "Run budget exhausted before stage start");
            return None;
        }
        match tokio::time::timeout(remaining, fut).await {
            Ok(out) => Some(out),
            Err(_) => {
                tracing::warn!(stage, "Run budget expired mid-stage; discarding partial output");
                None
            }
        }
    }

    /// Decision point 1: all-or-nothing listings.
    fn decide_listings(&self, live: Vec<ListingRecord>) -> Vec<ListingRecord> {
        if live.len() >= self.config.sufficiency_threshold {
            tracing::info!(count = live.len(), "Using live listing records");
            return live;
        }
        tracing::warn!(
            live = live.len(),
            threshold = self.config.sufficiency_threshold,
            "Insufficient live listing data; substituting synthetic records"
        );
        let (listings, _) = generate_synthetic(self.config.synthetic_count);
        listings
    }

    /// Decision point 2: synthetic history when live trends produced nothing.
    fn decide_history(&self, live: Vec<HistoricalPoint>) -> Vec<HistoricalPoint> {
        if !live.is_empty() {
            tracing::info!(points = live.len(), "Using live trend points");
            return live;
        }
        tracing::warn!("No live trend points; substituting synthetic history");
        let (_, history) = generate_synthetic(self.config.synthetic_count);
        history
    }

    /// Listings stage: visit each target, extract, accumulate. Per-target
    /// failures reduce the live count, nothing more.
    async fn collect_live_listings(&self) -> Vec<ListingRecord> {
        let mut records = Vec::new();
        for target in &self.config.listing_targets {
            tracing::info!(locality = %target.locality, url = %target.url, "Fetching listings");
            match self.fetcher.fetch(&target.url).await {
                Ok(body) => {
                    let extracted = self.listing_extractor.extract(&body, &target.locality);
                    if extracted.is_empty() {
                        tracing::warn!(locality = %target.locality, "No listing records on page");
                    } else {
                        tracing::info!(
                            locality = %target.locality,
                            count = extracted.len(),
                            "Extracted listing records"
                        );
                    }
                    records.extend(extracted);
                }
                Err(e) => {
                    tracing::warn!(locality = %target.locality, error = %e, "Skipping target");
                }
            }
        }
        records
    }

    /// Trends stage: fetch each locality page, read the FAQ observation,
    /// back-calculate the series. An invalid appreciation figure drops that
    /// locality's derived points but keeps its anchor point.
    async fn collect_live_trends(&self) -> Vec<HistoricalPoint> {
        let anchor_year = self.config.anchor_year;
        let mut points = Vec::new();

        for target in &self.config.trend_targets {
            tracing::info!(locality = %target.locality, "Fetching trend page");
            let body = match self.fetcher.fetch(&target.url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(locality = %target.locality, error = %e, "Skipping trend target");
                    continue;
                }
            };

            let Some(obs) = self.trend_extractor.extract(&body) else {
                tracing::debug!(locality = %target.locality, "No trend data on page");
                continue;
            };
            if obs.current_rate == 0 {
                tracing::warn!(locality = %target.locality, "Ignoring zero-rate observation");
                continue;
            }

            let anchor = HistoricalPoint {
                locality: target.locality.clone(),
                year: anchor_year,
                price_per_sqft: obs.current_rate,
                rental_yield: obs.rental_yield,
                provenance: Provenance::Live,
            };

            match obs.percentages {
                Some(pcts) => {
                    match derive_trend_points(
                        obs.current_rate,
                        pcts,
                        obs.rental_yield,
                        &target.locality,
                        anchor_year,
                    ) {
                        Ok(series) => {
                            tracing::info!(
                                locality = %target.locality,
                                points = series.len(),
                                "Derived trend points"
                            );
                            points.extend(series);
                        }
                        Err(e) => {
                            tracing::warn!(
                                locality = %target.locality,
                                error = %e,
                                "Dropping derived points for locality"
                            );
                            points.push(anchor);
                        }
                    }
                }
                None => points.push(anchor),
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Target;
    use crate::error::AppError;
    use crate::testutil::{MockFetcher, MockListingExtractor, MockTrendExtractor, make_test_listing};
    use crate::traits::TrendObservation;
    use crate::trend::TrendPercentages;
    use std::time::Duration;

    fn targets(n: usize) -> Vec<Target> {
        (0..n)
            .map(|i| Target::new(format!("Locality {i}"), format!("https://example.com/{i}")))
            .collect()
    }

    fn config_with_targets(listing: usize, trend: usize) -> PipelineConfig {
        let mut cfg = PipelineConfig {
            anchor_year: 2025,
            ..PipelineConfig::default()
        };
        cfg.listing_targets = targets(listing);
        cfg.trend_targets = targets(trend);
        cfg
    }

    #[tokio::test]
    async fn sufficient_live_listings_are_kept() {
        let live: Vec<_> = (0..6).map(|_| make_test_listing(8500)).collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new("<html/>"),
            MockListingExtractor::new(live),
            MockTrendExtractor::miss(),
            config_with_targets(1, 0),
        );

        let result = pipeline.run().await;
        assert_eq!(result.listings.len(), 6);
        assert_eq!(result.live_listing_count(), 6);
    }

    #[tokio::test]
    async fn insufficient_live_listings_are_fully_replaced() {
        // 4 live records across all targets is below the threshold of 5:
        // the stage must discard them all, never blend.
        let live: Vec<_> = (0..4).map(|_| make_test_listing(9000)).collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new("<html/>"),
            MockListingExtractor::new(live),
            MockTrendExtractor::miss(),
            config_with_targets(1, 0),
        );

        let result = pipeline.run().await;
        assert_eq!(result.listings.len(), 50);
        assert_eq!(result.live_listing_count(), 0);
    }

    #[tokio::test]
    async fn fetch_error_on_one_target_does_not_abort_stage() {
        let fetcher = MockFetcher::with_responses(vec![
            Err(AppError::HttpError("HTTP 503 for https://example.com/0".into())),
            Ok("<html/>".into()),
            Ok("<html/>".into()),
        ]);
        let live: Vec<_> = (0..3).map(|_| make_test_listing(8000)).collect();
        let pipeline = AcquisitionPipeline::new(
            fetcher,
            MockListingExtractor::new(live),
            MockTrendExtractor::miss(),
            config_with_targets(3, 0),
        );

        // Two successful targets x 3 records each = 6 live records.
        let result = pipeline.run().await;
        assert_eq!(result.live_listing_count(), 6);
    }

    #[tokio::test]
    async fn all_targets_failing_yields_fully_synthetic_output() {
        // Every fetch returns 503 after retries. The run must complete with
        // both stages synthetic.
        let responses: Vec<Result<String, AppError>> = (0..6)
            .map(|_| Err(AppError::HttpError("HTTP 503 for https://example.com".into())))
            .collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::with_responses(responses),
            MockListingExtractor::new(vec![]),
            MockTrendExtractor::miss(),
            config_with_targets(3, 3),
        );

        let result = pipeline.run().await;
        assert!(!result.listings.is_empty());
        assert!(!result.history.is_empty());
        assert_eq!(result.live_listing_count(), 0);
        assert_eq!(result.live_history_count(), 0);
        assert!(
            result
                .listings
                .iter()
                .all(|r| r.provenance == Provenance::Synthetic)
        );
        assert!(
            result
                .history
                .iter()
                .all(|p| p.provenance == Provenance::Synthetic)
        );
    }

    #[tokio::test]
    async fn trend_observation_yields_four_live_points_per_locality() {
        let obs = TrendObservation {
            current_rate: 11150,
            percentages: Some(TrendPercentages {
                p1: 5.3,
                p3: 15.2,
                p5: 25.1,
            }),
            rental_yield: Some(3.2),
        };
        let live: Vec<_> = (0..6).map(|_| make_test_listing(8500)).collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new("<html/>"),
            MockListingExtractor::new(live),
            MockTrendExtractor::new(obs),
            config_with_targets(1, 2),
        );

        let result = pipeline.run().await;
        assert_eq!(result.history.len(), 8);
        assert_eq!(result.live_history_count(), 8);
        assert_eq!(result.history[0].year, 2025);
        assert_eq!(result.history[0].price_per_sqft, 11150);
        // The observed yield rides along on every point of the series.
        assert!(result.history.iter().all(|p| p.rental_yield == Some(3.2)));
    }

    #[tokio::test]
    async fn invalid_appreciation_keeps_anchor_point_only() {
        let obs = TrendObservation {
            current_rate: 9000,
            percentages: Some(TrendPercentages {
                p1: 5.0,
                p3: 15.0,
                p5: -120.0,
            }),
            rental_yield: None,
        };
        let live: Vec<_> = (0..6).map(|_| make_test_listing(8500)).collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new("<html/>"),
            MockListingExtractor::new(live),
            MockTrendExtractor::new(obs),
            config_with_targets(1, 1),
        );

        let result = pipeline.run().await;
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.history[0].price_per_sqft, 9000);
        assert_eq!(result.history[0].provenance, Provenance::Live);
    }

    #[tokio::test]
    async fn zero_rate_observation_never_reaches_the_history() {
        // A strategy handing back a zero current rate must not produce a
        // zero-price anchor point; with no other live points the stage
        // falls back to synthetic history.
        let obs = TrendObservation {
            current_rate: 0,
            percentages: Some(TrendPercentages {
                p1: 5.3,
                p3: 15.2,
                p5: 25.1,
            }),
            rental_yield: Some(3.2),
        };
        let live: Vec<_> = (0..6).map(|_| make_test_listing(8500)).collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new("<html/>"),
            MockListingExtractor::new(live),
            MockTrendExtractor::new(obs),
            config_with_targets(1, 1),
        );

        let result = pipeline.run().await;
        assert_eq!(result.live_history_count(), 0);
        assert!(result.history.iter().all(|p| p.price_per_sqft > 0));
    }

    #[tokio::test]
    async fn rate_without_percentages_still_records_anchor() {
        let obs = TrendObservation {
            current_rate: 7800,
            percentages: None,
            rental_yield: Some(3.0),
        };
        let live: Vec<_> = (0..6).map(|_| make_test_listing(8500)).collect();
        let pipeline = AcquisitionPipeline::new(
            MockFetcher::new("<html/>"),
            MockListingExtractor::new(live),
            MockTrendExtractor::new(obs),
            config_with_targets(1, 1),
        );

        let result = pipeline.run().await;
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.history[0].price_per_sqft, 7800);
    }

    #[tokio::test]
    async fn exhausted_budget_falls_back_to_synthetic_without_hanging() {
        let slow = MockFetcher::with_delay("<html/>", Duration::from_millis(200));
        let live: Vec<_> = (0..6).map(|_| make_test_listing(8500)).collect();
        let mut cfg = config_with_targets(2, 2);
        cfg.run_budget = Duration::from_millis(20);

        let pipeline = AcquisitionPipeline::new(
            slow,
            MockListingExtractor::new(live),
            MockTrendExtractor::miss(),
            cfg,
        );

        let start = Instant::now();
        let result = pipeline.run().await;
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(result.live_listing_count(), 0);
        assert_eq!(result.live_history_count(), 0);
        assert!(!result.listings.is_empty());
        assert!(!result.history.is_empty());
    }
}
