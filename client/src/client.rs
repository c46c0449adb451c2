use crate::{Error, Result};
use pegboard_types::GameState;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use url::Url;

/// Timeout per request. The server is expected on a local network; a poll
/// that takes longer than this is treated as a transport failure.
const TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Retry policy for transient HTTP failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request (including the first attempt).
    pub max_attempts: usize,
    /// Initial backoff delay after the first retryable failure.
    pub initial_backoff: Duration,
    /// Maximum backoff delay between attempts.
    pub max_backoff: Duration,
    /// Whether non-idempotent requests (e.g., POST) may be retried.
    pub retry_non_idempotent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // One attempt: a failed deal or poll surfaces to the caller, who
        // decides whether to try again.
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            retry_non_idempotent: false,
        }
    }
}

/// Game server API client.
///
/// Wraps the three remote operations the table speaks: `deal`, `status`,
/// and `reset`. Every call resolves to a [`Result`]; nothing is cached,
/// deduplicated, or (by default) retried. Overlapping calls are allowed;
/// the store applies whichever full state lands last.
#[derive(Clone)]
pub struct Client {
    pub base_url: Url,
    http_client: HttpClient,
    retry_policy: RetryPolicy,
}

impl Client {
    /// Create a new client.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }

        let http_client = HttpClient::builder().timeout(TIMEOUT).build()?;

        Ok(Self {
            base_url,
            http_client,
            retry_policy: RetryPolicy::default(),
        })
    }

    /// Returns a copy of the current retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Returns a new client with the provided retry policy.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Ask the server to deal a fresh game and return its opening state.
    pub async fn deal(&self) -> Result<GameState> {
        self.fetch_state("deal").await
    }

    /// Fetch the current authoritative game state.
    pub async fn status(&self) -> Result<GameState> {
        self.fetch_state("status").await
    }

    /// Ask the server to abandon the current game. Any 2xx is success; the
    /// body is ignored.
    pub async fn reset(&self) -> Result<()> {
        let url = self.base_url.join("reset")?;
        debug!(%url, "resetting game");
        let response = self
            .send_with_retry(reqwest::Method::POST, || self.http_client.post(url.clone()))
            .await?;
        if !response.status().is_success() {
            return Err(Error::Failed(response.status()));
        }
        Ok(())
    }

    async fn fetch_state(&self, path: &str) -> Result<GameState> {
        let url = self.base_url.join(path)?;
        debug!(%url, "fetching game state");
        let response = self
            .send_with_retry(reqwest::Method::GET, || self.http_client.get(url.clone()))
            .await?;
        if !response.status().is_success() {
            return Err(Error::Failed(response.status()));
        }
        let body = response.text().await?;
        let state = serde_json::from_str(&body)?;
        Ok(state)
    }

    async fn send_with_retry(
        &self,
        method: reqwest::Method,
        make_request: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let max_attempts =
            if method == reqwest::Method::GET || self.retry_policy.retry_non_idempotent {
                self.retry_policy.max_attempts.max(1)
            } else {
                1
            };

        let mut attempt = 0usize;
        let mut backoff = self.retry_policy.initial_backoff;
        loop {
            attempt += 1;
            let result = make_request().send().await;
            match result {
                Ok(response) => {
                    let status = response.status();
                    if !is_retryable_status(status) || attempt >= max_attempts {
                        return Ok(response);
                    }
                }
                Err(err) => {
                    if attempt >= max_attempts || !is_retryable_error(&err) {
                        return Err(Error::Transport(err));
                    }
                }
            }

            if backoff > Duration::ZERO {
                sleep(backoff).await;
                backoff = std::cmp::min(backoff.saturating_mul(2), self.retry_policy.max_backoff);
            }
        }
    }
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    use reqwest::StatusCode;
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
