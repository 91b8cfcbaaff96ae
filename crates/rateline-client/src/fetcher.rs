use std::time::Duration;

use rand::seq::SliceRandom;
use rateline_core::config::{RETRYABLE_STATUS, TransportConfig, USER_AGENT_POOL};
use rateline_core::error::AppError;
use rateline_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

/// HTTP session built once per run: a reqwest client with a bounded timeout,
/// browser-like static headers, and an identity header drawn at construction
/// time from the configured pool.
///
/// Construction performs no network I/O. Failures surface only on individual
/// requests and are the caller's responsibility to interpret.
#[derive(Clone)]
pub struct SessionFetcher {
    client: Client,
    timeout_secs: u64,
    max_attempts: u32,
    backoff_base: Duration,
}

impl SessionFetcher {
    pub fn new(config: &TransportConfig) -> Result<Self, AppError> {
        let user_agent = config
            .user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| USER_AGENT_POOL[0].to_string());

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout.as_secs(),
            max_attempts: config.effective_retries(),
            backoff_base: config.backoff_base,
        })
    }
}

/// Static browser-like request headers sent with every request.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("max-age=0"),
    );
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("none"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers
}

/// Exponential-ish backoff: base doubled per completed attempt.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt.saturating_sub(1))
}

impl Fetcher for SessionFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(|e| {
                            AppError::HttpError(format!("Failed to read response body: {e}"))
                        });
                    }

                    let code = status.as_u16();
                    if RETRYABLE_STATUS.contains(&code) && attempt < self.max_attempts {
                        let delay = backoff_delay(self.backoff_base, attempt);
                        tracing::debug!(
                            url,
                            status = code,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Retryable status; backing off"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(AppError::HttpError(format!("HTTP {code} for {url}")));
                }
                Err(e) => {
                    if attempt < self.max_attempts {
                        let delay = backoff_delay(self.backoff_base, attempt);
                        tracing::debug!(url, attempt, error = %e, "Request failed; backing off");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(if e.is_timeout() {
                        AppError::Timeout(self.timeout_secs)
                    } else if e.is_connect() {
                        AppError::NetworkError(format!("Connection failed: {e}"))
                    } else {
                        AppError::HttpError(e.to_string())
                    });
                }
            }
        }
    }
}
