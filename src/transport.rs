use std::future::Future;
use std::time::Duration;

use reqwest::{header, RequestBuilder};
use serde_json::Value;

/// Status code and raw body of one HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Client or server error status (4xx/5xx).
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Transport-level failure, before any HTTP status is known.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connect error: {0}")]
    Connect(String),
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// Minimal async HTTP transport.
///
/// The executor only needs a status code and a body; anything able to
/// produce those can stand in for [`ReqwestTransport`].
pub trait Transport: Send + Sync {
    /// Performs one GET bounded by `timeout`.
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;

    /// Performs one POST with a JSON body, bounded by `timeout`.
    fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wraps a preconfigured client (proxy, user agent, default headers).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn send(&self, request: RequestBuilder) -> Result<RawResponse, TransportError> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(RawResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, TransportError> {
        self.send(self.http.get(url).timeout(timeout)).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.send(self.http.post(url).json(body).timeout(timeout)).await
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    // A connect that runs out of time reports both; the timeout is what matters.
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
