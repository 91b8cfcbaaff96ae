//! Test utilities: mock implementations of the pipeline traits.
//!
//! Handwritten mocks for dependency injection in unit tests. Mocks use
//! `Arc<Mutex<_>>` for interior mutability so configured responses can be
//! consumed across calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{ListingRecord, Provenance};
use crate::traits::{Fetcher, ListingExtractor, TrendExtractor, TrendObservation};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher returning a configurable queue of responses.
///
/// Each call pops the first element; an empty queue returns a default body.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    delay: Duration,
}

impl MockFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(body.to_string())])),
            delay: Duration::ZERO,
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Err(error)])),
            delay: Duration::ZERO,
        }
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            delay: Duration::ZERO,
        }
    }

    /// Fetcher that sleeps before every response, for budget tests.
    pub fn with_delay(body: &str, delay: Duration) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(body.to_string())])),
            delay,
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, AppError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockListingExtractor
// ---------------------------------------------------------------------------

/// Mock listing extractor returning the same records for every page.
#[derive(Clone)]
pub struct MockListingExtractor {
    records: Arc<Vec<ListingRecord>>,
}

impl MockListingExtractor {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Extractor that never finds anything.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl ListingExtractor for MockListingExtractor {
    fn extract(&self, _page_content: &str, _locality_hint: &str) -> Vec<ListingRecord> {
        self.records.as_ref().clone()
    }
}

// ---------------------------------------------------------------------------
// MockTrendExtractor
// ---------------------------------------------------------------------------

/// Mock trend extractor returning a fixed observation, or a miss.
#[derive(Clone)]
pub struct MockTrendExtractor {
    observation: Option<TrendObservation>,
}

impl MockTrendExtractor {
    pub fn new(observation: TrendObservation) -> Self {
        Self {
            observation: Some(observation),
        }
    }

    /// Extractor that always misses.
    pub fn miss() -> Self {
        Self { observation: None }
    }
}

impl TrendExtractor for MockTrendExtractor {
    fn extract(&self, _page_content: &str) -> Option<TrendObservation> {
        self.observation
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Build a live listing record with the given rate.
pub fn make_test_listing(rate: u32) -> ListingRecord {
    ListingRecord::new(
        "Shanti Park",
        "Mira Road",
        "Residential",
        rate,
        Some(25.0),
        Some(3.2),
        Provenance::Live,
    )
    .expect("test rate must be positive")
}
