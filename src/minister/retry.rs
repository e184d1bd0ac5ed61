//! Bounded retry loop around page fetching and response classification.
//!
//! Each attempt ends in one of three ways: the page carries prices, the
//! shop reports an empty search, or the attempt failed and is retried after
//! a polite sleep. Transport failures are mapped onto [`ScrapeStatus`] and
//! the last one seen is reported when all attempts are used up.

use crate::config::Config;
use crate::minister::classifier::{classify, PageKind};
use crate::minister::client::PageFetcher;
use crate::minister::models::ScrapeStatus;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a single attempt.
#[derive(Debug)]
enum Attempt {
    Prices(String),
    NoResults,
    /// Retry; carries the failure status, if the failure had one.
    Failed(Option<ScrapeStatus>),
}

/// Attempt budget and sleep schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub jitter_min_secs: u64,
    pub jitter_max_secs: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        let (jitter_min_secs, jitter_max_secs) = config.jitter_range();
        Self {
            attempts: config.retries,
            initial_delay: Duration::from_secs(config.initial_delay_secs),
            jitter_min_secs,
            jitter_max_secs,
        }
    }

    /// Sleep after the failed attempt with the given zero-based index.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            self.initial_delay
        } else {
            Duration::from_secs(
                rand::rng().random_range(self.jitter_min_secs..=self.jitter_max_secs),
            )
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Fetches a search page until it can be classified or attempts run out.
pub struct RetryController<'a> {
    fetcher: &'a dyn PageFetcher,
    policy: RetryPolicy,
}

impl<'a> RetryController<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Returns the page body together with [`ScrapeStatus::ValidPrices`], or
    /// no body and the status explaining why.
    pub async fn fetch(&self, url: &str) -> (Option<String>, ScrapeStatus) {
        let mut status = ScrapeStatus::OtherError;

        for attempt in 0..self.policy.attempts {
            debug!("Attempt {}/{} for {}", attempt + 1, self.policy.attempts, url);

            match self.attempt(url).await {
                Attempt::Prices(html) => return (Some(html), ScrapeStatus::ValidPrices),
                Attempt::NoResults => return (None, ScrapeStatus::NotFound),
                Attempt::Failed(failure) => {
                    if let Some(failure) = failure {
                        status = failure;
                    }
                }
            }

            if attempt + 1 < self.policy.attempts {
                let delay = self.policy.delay_after(attempt);
                info!("Sleeping for {} seconds...", delay.as_secs());
                tokio::time::sleep(delay).await;
            }
        }

        warn!("Giving up on {} after {} attempts: {}", url, self.policy.attempts, status);
        (None, status)
    }

    async fn attempt(&self, url: &str) -> Attempt {
        match self.fetcher.fetch(url).await {
            Ok(html) => match classify(&html) {
                PageKind::Prices => Attempt::Prices(html),
                PageKind::NoResults => Attempt::NoResults,
                PageKind::Unrecognized => {
                    warn!("Invalid price data in response from {}", url);
                    Attempt::Failed(None)
                }
            },
            Err(e) => {
                let status = e.status();
                warn!("{}: {}", status, e);
                Attempt::Failed(Some(status))
            }
        }
    }
}
