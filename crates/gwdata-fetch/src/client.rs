//! HTTP transport for the upstream dataset endpoint.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};
use std::time::Duration;
use thiserror::Error;

use crate::RetryPolicy;
use crate::request::{ACCEPT_CSV, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, WindowRequest};

/// Configuration for fetching windows.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Dataset endpoint URL.
    pub endpoint: String,
    /// Maximum windows in flight during a parallel run. Also caps the idle
    /// connections kept per host.
    pub concurrency: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Retry and backoff policy.
    pub retry: RetryPolicy,
    /// Rows requested per page.
    pub page_size: u32,
    /// User agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            concurrency: 4, // The upstream rate-limits aggressively
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: format!("gwdata/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A response as seen by the fetcher: status and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only a plain 200 counts as success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Failure to obtain any response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other send or body-read failure.
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Sends one window request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received.
    async fn send(&self, request: &WindowRequest) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(&FetchConfig::default())
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &WindowRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&request.params())
            .header(header::ACCEPT, ACCEPT_CSV)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.user_agent.starts_with("gwdata/"));
    }

    #[tokio::test]
    async fn test_transport_creation() {
        let transport = HttpTransport::with_defaults().unwrap();
        assert_eq!(transport.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_response_success_is_200_only() {
        assert!(TransportResponse::new(200, "a,b\n").is_success());
        assert!(!TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(500, "").is_success());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = FetchConfig {
            endpoint: "http://127.0.0.1:9/Dataset".to_string(),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        let selector = gwdata_types::EntitySelector::new("Odisha", "Baleshwar", "CGWB");
        let day = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let window = gwdata_types::DateWindow { start: day, end: day };

        let result = transport
            .send(&WindowRequest::new(&selector, window, 1000))
            .await;
        assert!(result.is_err());
    }
}
