//! HTTP access to the SPARQL endpoint.
//!
//! The network sits behind [`HttpTransport`] so the retry loop and the rest of
//! the pipeline can run against canned responses in tests.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const USER_AGENT: &str = "masterpiece-collection/1.0 (local dev; contact: none)";
pub const ACCEPT: &str = "application/sparql-results+json";

/// Characters of the response body kept in a status error.
const BODY_SNIPPET_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("WDQS failed: {status} {status_text}\n{body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Raw response as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpTransport {
    /// Perform a GET. Non-2xx statuses are returned as responses, not errors.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// Blocking `reqwest` client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        // Body of a failed response is best-effort.
        let body = match resp.text() {
            Ok(text) => text,
            Err(e) if status.is_success() => return Err(FetchError::Transport(e.to_string())),
            Err(_) => String::new(),
        };
        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

/// `<endpoint>?format=json&query=<encoded>`.
pub fn request_url(endpoint: &str, query: &str) -> String {
    format!(
        "{endpoint}?format=json&query={}",
        urlencoding::encode(query)
    )
}

/// Single attempt: GET, check status, parse JSON.
pub fn fetch_sparql(
    transport: &dyn HttpTransport,
    endpoint: &str,
    query: &str,
) -> Result<Value, FetchError> {
    let url = request_url(endpoint, query);
    let headers = [("Accept", ACCEPT), ("User-Agent", USER_AGENT)];
    let resp = transport.get(&url, &headers)?;
    if !resp.is_success() {
        return Err(FetchError::Status {
            status: resp.status,
            status_text: resp.status_text,
            body: resp.body.chars().take(BODY_SNIPPET_CHARS).collect(),
        });
    }
    Ok(serde_json::from_str(&resp.body)?)
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fixed attempt cap with a linearly growing wait: `base_delay * attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1200),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached. The last
/// error is returned on exhaustion. `op` receives the 1-based attempt number.
pub fn retry<T, F>(policy: &RetryPolicy, sleeper: &dyn Sleeper, mut op: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match op(attempt) {
            Ok(value) => {
                debug!(attempt, "fetch succeeded");
                return Ok(value);
            }
            Err(err) if attempt < max => {
                let wait = policy.delay_after(attempt);
                warn!("Attempt {attempt}/{max} failed, retrying in {wait:?}: {err}");
                sleeper.sleep(wait);
                attempt += 1;
            }
            Err(err) => {
                warn!("Attempt {attempt}/{max} failed: {err}");
                return Err(err);
            }
        }
    }
}

pub fn fetch_with_retry(
    transport: &dyn HttpTransport,
    endpoint: &str,
    query: &str,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
) -> Result<Value, FetchError> {
    retry(policy, sleeper, |_| fetch_sparql(transport, endpoint, query))
}
