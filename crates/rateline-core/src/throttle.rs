//! Per-origin politeness throttling.
//!
//! Wraps any [`Fetcher`] with a minimum inter-request spacing per origin
//! (scheme + host + port), with optional random jitter on top. Targets
//! within a stage share one origin, so this is what enforces the polite
//! delay between consecutive page fetches.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;
use url::Url;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Politeness settings.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum delay between consecutive requests to the same origin.
    pub delay: Duration,
    /// Maximum random jitter added on top of `delay` (uniform [0, jitter]).
    pub jitter: Duration,
}

impl ThrottleConfig {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Effective delay for one wait: base delay plus a random jitter draw.
    fn effective_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=self.jitter.as_millis() as u64);
        self.delay + Duration::from_millis(jitter_ms)
    }
}

impl Default for ThrottleConfig {
    /// 1s delay with up to 1s jitter — the documented 1–4 unit polite range
    /// sits inside this once the per-request time is counted.
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        }
    }
}

/// A [`Fetcher`] wrapper that spaces out requests per origin.
///
/// Tracks the last request time per origin and sleeps before a new request
/// if the minimum spacing has not elapsed. The inner client is read-only
/// after construction; only the timestamp map mutates.
#[derive(Clone)]
pub struct ThrottledFetcher<F> {
    inner: F,
    config: ThrottleConfig,
    last_request: Arc<Mutex<HashMap<String, Instant>>>,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    pub fn new(inner: F, config: ThrottleConfig) -> Self {
        Self {
            inner,
            config,
            last_request: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Origin key for a URL: scheme://host:port.
    fn origin_key(url_str: &str) -> Option<String> {
        let url = Url::parse(url_str).ok()?;
        let host = url.host_str()?;
        let port = url
            .port_or_known_default()
            .map(|p| format!(":{p}"))
            .unwrap_or_default();
        Some(format!("{}://{}{}", url.scheme(), host, port))
    }

    async fn wait_for_origin(&self, origin: &str) {
        let mut map = self.last_request.lock().await;

        if let Some(&last) = map.get(origin) {
            let elapsed = last.elapsed();
            let required = self.config.effective_delay();
            if elapsed < required {
                let sleep_duration = required - elapsed;
                // Drop the lock while sleeping so other origins aren't blocked.
                drop(map);
                tracing::debug!(
                    origin = %origin,
                    sleep_ms = %sleep_duration.as_millis(),
                    "Throttling request"
                );
                tokio::time::sleep(sleep_duration).await;
                let mut map = self.last_request.lock().await;
                map.insert(origin.to_string(), Instant::now());
                return;
            }
        }
        map.insert(origin.to_string(), Instant::now());
    }
}

impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        if let Some(origin) = Self::origin_key(url) {
            self.wait_for_origin(&origin).await;
        }
        self.inner.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockFetcher;

    #[test]
    fn origin_key_covers_scheme_host_port() {
        assert_eq!(
            ThrottledFetcher::<MockFetcher>::origin_key("https://example.com/rates?p=1"),
            Some("https://example.com:443".to_string())
        );
        assert_eq!(
            ThrottledFetcher::<MockFetcher>::origin_key("http://example.com:8080/x"),
            Some("http://example.com:8080".to_string())
        );
        assert_eq!(ThrottledFetcher::<MockFetcher>::origin_key("not-a-url"), None);
    }

    #[test]
    fn effective_delay_is_bounded_by_jitter() {
        let config =
            ThrottleConfig::new(Duration::from_millis(100)).with_jitter(Duration::from_millis(50));
        for _ in 0..100 {
            let d = config.effective_delay();
            assert!(d >= Duration::from_millis(100));
            assert!(d <= Duration::from_millis(150));
        }
    }

    #[tokio::test]
    async fn same_origin_requests_are_spaced() {
        let inner = MockFetcher::new("<html>ok</html>");
        let fetcher =
            ThrottledFetcher::new(inner, ThrottleConfig::new(Duration::from_millis(100)));

        let start = Instant::now();
        fetcher.fetch("http://example.com/a").await.unwrap();
        fetcher.fetch("http://example.com/b").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn different_origins_are_not_spaced() {
        let inner = MockFetcher::new("<html>ok</html>");
        let fetcher =
            ThrottledFetcher::new(inner, ThrottleConfig::new(Duration::from_millis(200)));

        let start = Instant::now();
        fetcher.fetch("http://example.com/a").await.unwrap();
        fetcher.fetch("http://other.com/a").await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let inner = MockFetcher::with_error(AppError::HttpError("fail".into()));
        let fetcher = ThrottledFetcher::new(inner, ThrottleConfig::new(Duration::ZERO));
        let err = fetcher.fetch("http://example.com").await.unwrap_err();
        assert!(matches!(err, AppError::HttpError(_)));
    }
}
