//! HTTP client abstraction for testability.
//!
//! The routing and search clients depend on [`AsyncHttpClient`] rather than on
//! `reqwest` directly, so tests can substitute canned responses.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the HTTP layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// The request could not be sent or timed out.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be read.
    #[error("Failed to read response: {0}")]
    Body(String),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// True for HTTP 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::Status { status: 404, .. })
    }
}

/// Trait for asynchronous HTTP GET operations.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

/// Builds a URL with percent-encoded query parameters.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String, HttpError> {
    reqwest::Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base, e)))
}

/// Builds a URL from `base`, extra path segments and query parameters.
///
/// Each segment is percent-encoded as a single path segment, so ids that
/// contain `/`, `?` or `#` cannot change the request target.
pub fn build_url_with_path(
    base: &str,
    segments: &[&str],
    params: &[(&str, &str)],
) -> Result<String, HttpError> {
    let invalid = |reason: String| HttpError::InvalidUrl(format!("{}: {}", base, reason));
    let mut url = reqwest::Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base URL".to_string()))?
        .pop_if_empty()
        .extend(segments);
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url.into())
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wayfinder/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let redacted = redact_token(url);
        trace!(url = %redacted, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = %redacted,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                let e = e.without_url();
                warn!(
                    url = %redacted,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(HttpError::Request(e.to_string()));
            }
        };

        if !response.status().is_success() {
            return Err(HttpError::Status {
                status: response.status().as_u16(),
                url: redacted,
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| HttpError::Body(e.without_url().to_string()))
    }
}

/// Replaces the `access_token` query value so tokens never reach the logs.
pub fn redact_token(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == "access_token" {
                        "***".to_string()
                    } else {
                        v.into_owned()
                    };
                    (k.into_owned(), v)
                })
                .collect();
            if pairs.is_empty() {
                return parsed.to_string();
            }
            parsed.query_pairs_mut().clear().extend_pairs(pairs);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
