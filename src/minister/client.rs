//! HTTP client for baseballminister.de using wreq.

use crate::config::Config;
use crate::error::FetchError;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Browser user agents rotated per request to look less like a bot.
pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/117.0.5938.132 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:118.0) Gecko/20100101 Firefox/118.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/117.0.5938.132 Safari/537.36 Edg/117.0.2045.43",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_4_1) AppleWebKit/537.36 (KHTML, like Gecko) \
     Version/16.5 Safari/537.36",
];

/// Server errors that are re-requested before giving up.
const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Trait for page fetching - enables mocking for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a GET and returns the body of a successful response.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Picks a user agent from the pool.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())]
}

/// Shop HTTP client with user agent rotation. Transport failures and 5xx
/// responses are re-requested up to `retries` times.
pub struct MinisterClient {
    client: Client,
    max_retries: u32,
    backoff_factor_secs: u64,
}

impl MinisterClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_retries: config.retries,
            backoff_factor_secs: config.backoff_factor_secs,
        })
    }

    /// Delay before the n-th re-request (1-based). The first re-request is
    /// immediate, later ones back off exponentially.
    fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let secs = self.backoff_factor_secs.saturating_mul(1u64 << (retry - 1).min(62));
        Duration::from_secs(secs)
    }

    async fn get(&self, url: &str, user_agent: &str) -> Result<wreq::Response, FetchError> {
        self.client
            .get(url)
            .header("User-Agent", user_agent)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "de-DE,de;q=0.9,en;q=0.8")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })
    }
}

#[async_trait]
impl PageFetcher for MinisterClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = random_user_agent();
        debug!("GET {} (User-Agent: {})", url, user_agent);

        let mut retry = 0u32;
        let response = loop {
            // Connect and timeout failures share the server error budget
            let response = match self.get(url, user_agent).await {
                Ok(response) => response,
                Err(e) if retry < self.max_retries => {
                    retry += 1;
                    let delay = self.backoff(retry);
                    warn!("{}, retry {} in {:?}", e, retry, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let status = response.status().as_u16();
            debug!("Response status: {}", status);

            if !RETRY_STATUSES.contains(&status) {
                break response;
            }

            if retry >= self.max_retries {
                return Err(FetchError::RetriesExhausted {
                    status,
                    url: url.to_string(),
                    attempts: retry + 1,
                });
            }
            retry += 1;

            // A Retry-After on 503 overrides the computed backoff
            let delay = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .filter(|_| status == 503)
                .map(Duration::from_secs)
                .unwrap_or_else(|| self.backoff(retry));

            warn!("Server error {} from {}, retry {} in {:?}", status, url, retry, delay);
            tokio::time::sleep(delay).await;
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: url.to_string() });
        }

        response.text().await.map_err(|source| FetchError::Body { url: url.to_string(), source })
    }
}
