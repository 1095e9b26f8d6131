//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the downloader, including:
//! - Building the shared HTTP client
//! - Following redirects by hand so the redirect chain is observable
//! - Retrying transient failures with capped exponential backoff
//! - Short-circuiting on redirect-based "not found"

use crate::catalog::redirect::{is_not_found, RedirectChain};
use crate::config::FetchLimits;
use reqwest::header::LOCATION;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: Url,
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Raw response body, unmodified
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One failed attempt that is worth retrying
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransientError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl TransientError {
    fn from_request(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransientError::Timeout
        } else if error.is_connect() {
            TransientError::Connect(error.to_string())
        } else {
            TransientError::Other(error.to_string())
        }
    }

    fn from_body(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransientError::Timeout
        } else {
            TransientError::Body(error.to_string())
        }
    }
}

/// Terminal outcome of a failed [`fetch`]
#[derive(Debug, Error)]
pub enum FetchError {
    /// The response was reached through a redirect; never retried
    #[error("Resource not found, redirect occurred: {url}")]
    NotFound { url: Url },

    /// Every attempt failed transiently
    #[error("Failed to retrieve data from {url} after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        url: Url,
        attempts: u32,
        last_error: TransientError,
    },

    /// Redirect chain was too long, looped, or had no usable target
    #[error("Redirect error for {url}: {reason}")]
    Redirect { url: Url, reason: String },
}

/// Outcome of a single attempt
enum AttemptError {
    Transient(TransientError),
    Redirect(String),
}

impl From<TransientError> for AttemptError {
    fn from(error: TransientError) -> Self {
        AttemptError::Transient(error)
    }
}

/// Builds the HTTP client shared by every request of a run
///
/// Redirects are disabled at the client level; [`fetch`] follows them
/// itself so it can tell whether any were taken. Timeouts are set per
/// request from the current backoff value.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("tululu-fetch/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying transient failures with exponential backoff
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx reached without redirects | Return the body |
/// | 2xx reached through a redirect | Immediate → `NotFound` |
/// | HTTP 4xx / 5xx | Retry |
/// | Timeout, connection error | Retry |
/// | Redirect loop or chain > 10 | Immediate → `Redirect` |
///
/// Attempt `k` uses `min(read_timeout * 2^(k-1), max_backoff)` as its
/// request timeout, and the same duration is slept after a failed attempt
/// unless it was the last one. Each failed attempt is logged as a warning.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `limits` - Timeout, backoff cap and attempt budget
pub async fn fetch(client: &Client, url: &Url, limits: &FetchLimits) -> Result<FetchedPage, FetchError> {
    let max_attempts = limits.max_attempts.max(1);
    let mut last_error = TransientError::Other("no attempt made".to_string());

    for attempt in 1..=max_attempts {
        let timeout = limits.timeout_for_attempt(attempt);
        match attempt_fetch(client, url, timeout).await {
            Ok(Some(page)) => return Ok(page),
            Ok(None) => {
                tracing::debug!("{} answered through a redirect, treating as not found", url);
                return Err(FetchError::NotFound { url: url.clone() });
            }
            Err(AttemptError::Redirect(reason)) => {
                return Err(FetchError::Redirect {
                    url: url.clone(),
                    reason,
                });
            }
            Err(AttemptError::Transient(error)) => {
                tracing::warn!(
                    "Attempt {} of {} to retrieve data from {} failed: {}",
                    attempt,
                    max_attempts,
                    url,
                    error
                );
                if attempt != max_attempts {
                    tokio::time::sleep(timeout).await;
                }
                last_error = error;
            }
        }
    }

    Err(FetchError::ExhaustedRetries {
        url: url.clone(),
        attempts: max_attempts,
        last_error,
    })
}

/// Runs one attempt; `Ok(None)` means the response was classified not-found
async fn attempt_fetch(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<Option<FetchedPage>, AttemptError> {
    let (response, chain) = send_following_redirects(client, url, timeout).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransientError::Status(status.as_u16()).into());
    }

    if is_not_found(&chain) {
        tracing::debug!(
            "Redirected {} time(s): {}",
            chain.len(),
            chain
                .hops()
                .iter()
                .map(Url::as_str)
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        return Ok(None);
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| TransientError::from_body(&e))?;

    Ok(Some(FetchedPage {
        url: url.clone(),
        status: status.as_u16(),
        body: body.to_vec(),
    }))
}

/// Sends a GET and follows up to [`MAX_REDIRECTS`](super::MAX_REDIRECTS) hops
async fn send_following_redirects(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<(Response, RedirectChain), AttemptError> {
    let mut chain = RedirectChain::new();
    let mut current = url.clone();

    loop {
        let response = client
            .get(current.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransientError::from_request(&e))?;

        if !response.status().is_redirection() {
            return Ok((response, chain));
        }

        let next = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| current.join(location).ok())
            .ok_or_else(|| {
                AttemptError::Redirect(format!(
                    "HTTP {} from {} without a valid Location header",
                    response.status().as_u16(),
                    current
                ))
            })?;

        if chain.is_exhausted() {
            return Err(AttemptError::Redirect(format!(
                "more than {} redirects",
                chain.len()
            )));
        }

        if next == current || chain.contains(&next) {
            return Err(AttemptError::Redirect(format!("redirect loop at {}", next)));
        }

        tracing::debug!("Following redirect {} -> {}", current, next);
        chain.push(current);
        current = next;
    }
}
