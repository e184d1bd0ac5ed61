//! Typed transport errors and their mapping onto scrape statuses.

use crate::minister::models::ScrapeStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] wreq::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("gave up on {url} after {attempts} attempts, last status {status}")]
    RetriesExhausted { status: u16, url: String, attempts: u32 },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: wreq::Error,
    },
}

impl FetchError {
    /// Maps the error to the status the retry controller reports for it.
    pub fn status(&self) -> ScrapeStatus {
        match self {
            FetchError::Status { status: 429, .. } => ScrapeStatus::TooManyRequestsError,
            FetchError::Status { .. } | FetchError::Transport { .. } => ScrapeStatus::RequestError,
            FetchError::RetriesExhausted { .. } => ScrapeStatus::ServerError,
            FetchError::Client(_) | FetchError::Body { .. } => ScrapeStatus::OtherError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let url = "https://example.com".to_string();

        let err = FetchError::Status { status: 429, url: url.clone() };
        assert_eq!(err.status(), ScrapeStatus::TooManyRequestsError);

        let err = FetchError::Status { status: 404, url: url.clone() };
        assert_eq!(err.status(), ScrapeStatus::RequestError);

        let err = FetchError::Status { status: 403, url: url.clone() };
        assert_eq!(err.status(), ScrapeStatus::RequestError);

        let err = FetchError::RetriesExhausted { status: 503, url, attempts: 4 };
        assert_eq!(err.status(), ScrapeStatus::ServerError);
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::Status { status: 404, url: "https://example.com/x".to_string() };
        assert_eq!(err.to_string(), "HTTP status 404 from https://example.com/x");

        let err = FetchError::RetriesExhausted {
            status: 502,
            url: "https://example.com".to_string(),
            attempts: 4,
        };
        assert!(err.to_string().contains("after 4 attempts"));
        assert!(err.to_string().contains("502"));
    }
}
