//! Explicit configuration for the acquisition pipeline.
//!
//! No module-level mutable state: every knob is a field on one of these
//! structs, passed into session construction or the pipeline. Defaults
//! match the documented operating values.

use std::time::Duration;

use chrono::{Datelike, Utc};

/// Fixed pool of browser identity strings. One is drawn at session-creation
/// time to vary the outbound request fingerprint across runs.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// HTTP status codes that are worth retrying.
pub const RETRYABLE_STATUS: &[u16] = &[429, 500, 502, 503, 504];

/// Transport-layer settings for session construction.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total retry attempts on retryable failures, clamped to 1..=3.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub backoff_base: Duration,
    /// Identity strings to draw from at session creation.
    pub user_agents: Vec<String>,
}

impl Default for TransportConfig {
    /// 10s timeout, 2 retries, 500ms backoff base, the standard identity pool.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff_base: Duration::from_millis(500),
            user_agents: USER_AGENT_POOL.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TransportConfig {
    /// Retry attempts bounded to the documented 1..=3 range.
    pub fn effective_retries(&self) -> u32 {
        self.max_retries.clamp(1, 3)
    }
}

/// One acquisition target: a locality name and the page to fetch for it.
#[derive(Debug, Clone)]
pub struct Target {
    pub locality: String,
    pub url: String,
}

impl Target {
    pub fn new(locality: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            url: url.into(),
        }
    }
}

/// Build a price-trends page URL for a locality from the slug rule.
///
/// `rate_page_url("https://example.com", "Mira Road East", "mira-bhayandar")`
/// → `https://example.com/property-rates-and-price-trends-in-mira-road-east-mira-bhayandar-prffid`
pub fn rate_page_url(base: &str, locality: &str, town_slug: &str) -> String {
    let slug = locality.trim().to_lowercase().replace(' ', "-");
    format!(
        "{}/property-rates-and-price-trends-in-{}-{}-prffid",
        base.trim_end_matches('/'),
        slug,
        town_slug
    )
}

/// Build a listing-search page URL for a locality slug and page number.
///
/// `listing_page_url("https://example.com", "mira-road-east-mumbai", 2)`
/// → `https://example.com/property-in-mira-road-east-mumbai-ffid?page=2`
pub fn listing_page_url(base: &str, locality_slug: &str, page: u32) -> String {
    format!(
        "{}/property-in-{}-ffid?page={}",
        base.trim_end_matches('/'),
        locality_slug,
        page
    )
}

/// Pipeline-level settings: targets, fallback policy, and time budget.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pages to visit for the listings stage.
    pub listing_targets: Vec<Target>,
    /// Per-locality pages to visit for the trends stage.
    pub trend_targets: Vec<Target>,
    /// Minimum live listing count; below this, the whole stage is replaced
    /// by synthetic output.
    pub sufficiency_threshold: usize,
    /// Records to ask the synthetic generator for when falling back.
    pub synthetic_count: usize,
    /// Year assigned to the "current rate" trend point.
    pub anchor_year: i32,
    /// Total wall-clock budget for the run. A stage that has not started
    /// before expiry goes straight to the synthetic generator.
    pub run_budget: Duration,
}

impl Default for PipelineConfig {
    /// Threshold 5, 50 synthetic records, current calendar year as anchor,
    /// 120s budget, no targets (callers supply them).
    fn default() -> Self {
        Self {
            listing_targets: Vec::new(),
            trend_targets: Vec::new(),
            sufficiency_threshold: 5,
            synthetic_count: 50,
            anchor_year: Utc::now().year(),
            run_budget: Duration::from_secs(120),
        }
    }
}

impl PipelineConfig {
    /// Populate trend targets from locality names using the slug rule.
    pub fn with_trend_localities(
        mut self,
        base: &str,
        town_slug: &str,
        localities: &[&str],
    ) -> Self {
        self.trend_targets = localities
            .iter()
            .map(|name| Target::new(*name, rate_page_url(base, name, town_slug)))
            .collect();
        self
    }

    /// Populate listing targets from (name, slug) pairs, visiting a fixed
    /// number of search pages per locality.
    pub fn with_listing_localities(
        mut self,
        base: &str,
        localities: &[(&str, &str)],
        pages: u32,
    ) -> Self {
        self.listing_targets = localities
            .iter()
            .flat_map(|(name, slug)| {
                (1..=pages.max(1))
                    .map(|page| Target::new(*name, listing_page_url(base, slug, page)))
            })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_are_clamped() {
        let mut cfg = TransportConfig::default();
        cfg.max_retries = 0;
        assert_eq!(cfg.effective_retries(), 1);
        cfg.max_retries = 9;
        assert_eq!(cfg.effective_retries(), 3);
        cfg.max_retries = 2;
        assert_eq!(cfg.effective_retries(), 2);
    }

    #[test]
    fn slug_rule_builds_expected_url() {
        assert_eq!(
            rate_page_url("https://example.com/", "Mira Road East", "mira-bhayandar"),
            "https://example.com/property-rates-and-price-trends-in-mira-road-east-mira-bhayandar-prffid"
        );
    }

    #[test]
    fn trend_localities_expand_to_targets() {
        let cfg = PipelineConfig::default().with_trend_localities(
            "https://example.com",
            "mira-bhayandar",
            &["Mira Road", "Bhayandar West"],
        );
        assert_eq!(cfg.trend_targets.len(), 2);
        assert_eq!(cfg.trend_targets[0].locality, "Mira Road");
        assert!(cfg.trend_targets[1].url.contains("bhayandar-west"));
    }

    #[test]
    fn listing_localities_expand_per_page() {
        let cfg = PipelineConfig::default().with_listing_localities(
            "https://example.com",
            &[("Mira Road East", "mira-road-east-mumbai")],
            2,
        );
        assert_eq!(cfg.listing_targets.len(), 2);
        assert_eq!(
            cfg.listing_targets[1].url,
            "https://example.com/property-in-mira-road-east-mumbai-ffid?page=2"
        );
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.sufficiency_threshold, 5);
        assert_eq!(cfg.synthetic_count, 50);
        assert_eq!(cfg.run_budget, Duration::from_secs(120));
    }
}
