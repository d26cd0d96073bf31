//! HTTP client for dump and block API requests.

use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the download client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum concurrent requests (block API sync runs this many in flight).
    pub concurrency: usize,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            // Dump files run to gigabytes; the body is streamed, so the
            // timeout only has to cover time-to-first-byte per read.
            timeout: Duration::from_secs(120),
            max_retries: 8,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            user_agent: format!("blockprice/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during HTTP requests.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status after all retries.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },
}

/// HTTP client with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a GET with retries and returns the open response.
    ///
    /// Returns `Ok(None)` on 404. The caller decides whether to buffer
    /// the body or stream it; retries only cover getting a good status,
    /// not a stream that breaks mid-body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retries.
    pub async fn get(&self, url: &str) -> Result<Option<Response>, DownloadError> {
        let mut attempt = 0;

        loop {
            let failure = match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return Ok(None);
                }
                // 5xx and 429 are worth waiting out; the rest of the 4xx
                // range is the caller's problem.
                Ok(response) if Self::transient_status(response.status()) => {
                    DownloadError::ServerError {
                        status: response.status().as_u16(),
                    }
                }
                Ok(response) => {
                    response.error_for_status_ref()?;
                    return Ok(Some(response));
                }
                Err(e) if retryable(&e) => DownloadError::Http(e),
                Err(e) => return Err(e.into()),
            };

            attempt += 1;
            if attempt > self.config.max_retries {
                return Err(failure);
            }
            tokio::time::sleep(self.backoff(attempt)).await;
        }
    }

    /// Downloads a small payload fully into memory.
    ///
    /// Returns `Ok(None)` on 404.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails after all retries.
    pub async fn download(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        match self.get(url).await? {
            Some(response) => Ok(Some(response.bytes().await?)),
            None => Ok(None),
        }
    }

    fn transient_status(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Exponential backoff with deterministic jitter (±25%, keyed off the
    /// attempt number so no RNG is needed), floored at 100ms.
    fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self.config.base_delay_ms << attempt.min(10);
        let capped = exponential.min(self.config.max_delay_ms);

        let half_spread = capped / 4;
        let offset = u64::from(attempt).wrapping_mul(17) % (half_spread.max(1) * 2);
        let jittered = capped.saturating_add_signed(offset as i64 - half_spread as i64);

        Duration::from_millis(jittered.max(100))
    }
}

/// Transport-level failures worth another attempt. Builder errors are
/// configuration issues; repeating them cannot help.
fn retryable(error: &reqwest::Error) -> bool {
    !error.is_builder() && (error.is_timeout() || error.is_connect() || error.is_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.max_retries, 8);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 30_000);
    }

    #[tokio::test]
    async fn test_client_creation() {
        assert!(DownloadClient::with_defaults().is_ok());
    }

    #[test]
    fn test_backoff_grows_then_caps() {
        let client = DownloadClient::with_defaults().unwrap();

        // 500ms base doubled once, plus at most 25% jitter either way.
        let first = client.backoff(1).as_millis();
        assert!((750..=1250).contains(&first));

        let second = client.backoff(2).as_millis();
        assert!((1500..=2500).contains(&second));

        // Deep retries stay at max_delay plus jitter.
        let deep = client.backoff(20).as_millis();
        assert!(deep <= 37_500);
    }

    #[test]
    fn test_backoff_is_deterministic() {
        let client = DownloadClient::with_defaults().unwrap();
        assert_eq!(client.backoff(3), client.backoff(3));
    }

    #[test]
    fn test_backoff_jitter_is_signed() {
        let client = DownloadClient::with_defaults().unwrap();

        // Low attempt keys land in the bottom half of the spread, so the
        // jittered delay must fall below the unjittered 1000ms.
        let first = client.backoff(1).as_millis();
        assert!(first < 1000);
        assert!(first >= 750);
    }

    #[test]
    fn test_transient_statuses() {
        assert!(DownloadClient::transient_status(
            StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(DownloadClient::transient_status(
            StatusCode::TOO_MANY_REQUESTS
        ));
        assert!(!DownloadClient::transient_status(StatusCode::FORBIDDEN));
        assert!(!DownloadClient::transient_status(StatusCode::OK));
    }
}
