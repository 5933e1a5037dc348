use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

const APP_USER_AGENT: &str = concat!("mctui/", env!("CARGO_PKG_VERSION"));

/// Longest a single read may stall. Slow transfers that keep moving are never cut off.
const READ_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_http_client() -> Result<Client, reqwest::Error> {
    build_http_client_with(READ_TIMEOUT)
}

pub fn build_http_client_with(read_timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(read_timeout)
        .build()
}

/// Bounded retry with exponential backoff for transient HTTP failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Wait before retry number `attempt` (zero-based), doubling each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.min_wait
            .checked_mul(factor)
            .unwrap_or(self.max_wait)
            .min(self.max_wait)
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_transient_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// GET `url`, retrying connect/timeouts and 429/5xx responses.
///
/// Returns the first successful response. Non-transient statuses fail
/// immediately with [`LauncherError::DownloadFailed`].
pub async fn get_with_retry(
    client: &Client,
    url: &str,
    policy: RetryPolicy,
) -> LauncherResult<Response> {
    let mut attempt = 0;
    loop {
        let outcome = match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }
                let err = LauncherError::DownloadFailed {
                    url: url.to_string(),
                    status: status.as_u16(),
                };
                if !is_transient_status(status) {
                    return Err(err);
                }
                err
            }
            Err(err) => {
                if !is_transient_error(&err) {
                    return Err(err.into());
                }
                err.into()
            }
        };

        if attempt >= policy.max_retries {
            return Err(outcome);
        }
        let wait = policy.backoff(attempt);
        debug!("Retrying {} in {:?} after: {}", url, wait, outcome);
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(10), Duration::from_secs(10));
        assert_eq!(policy.backoff(40), Duration::from_secs(10));
    }

    #[test]
    fn only_throttling_and_server_errors_are_transient() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
        assert!(!is_transient_status(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn stalled_response_times_out_and_is_retried() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let stalled = server
            .mock_async(|when, then| {
                when.method(GET).path("/stall");
                then.status(200)
                    .delay(Duration::from_millis(800))
                    .body("late");
            })
            .await;

        let client = build_http_client_with(Duration::from_millis(100)).unwrap();
        let policy = RetryPolicy {
            max_retries: 1,
            min_wait: Duration::from_millis(5),
            max_wait: Duration::from_millis(5),
        };
        let err = get_with_retry(&client, &server.url("/stall"), policy)
            .await
            .unwrap_err();

        assert!(matches!(err, LauncherError::Http(ref e) if e.is_timeout()));
        assert_eq!(stalled.hits_async().await, 2);
    }

    #[tokio::test]
    async fn slow_response_within_stall_limit_succeeds() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200)
                    .delay(Duration::from_millis(300))
                    .body("eventually");
            })
            .await;

        let client = build_http_client_with(Duration::from_secs(2)).unwrap();
        let response = get_with_retry(&client, &server.url("/slow"), RetryPolicy::none())
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "eventually");
    }
}
