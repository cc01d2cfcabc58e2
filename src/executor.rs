use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    json,
    transport::{RawResponse, ReqwestTransport, Transport, TransportError},
    ExecutorOptions, FetchError, FetchOutcome, RequestDescriptor, Result,
};

#[derive(Clone, Debug)]
/// Issues JSON GETs with a bounded number of sequential attempts.
pub struct RequestExecutor<T = ReqwestTransport> {
    transport: T,
    options: ExecutorOptions,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor {
    /// Creates an executor over a fresh `reqwest` client with default options.
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            options: ExecutorOptions::default(),
        }
    }

    /// Applies the defaults used by [`RequestExecutor::get`].
    pub fn with_options(mut self, opts: ExecutorOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url` using this executor's options.
    pub async fn get(&self, url: &str) -> FetchOutcome {
        self.execute(&self.options.descriptor(url)).await
    }

    /// Fetches `url` and deserializes the decoded body into `D`.
    pub async fn get_json<D: DeserializeOwned>(&self, url: &str) -> Result<D> {
        let value = self.get(url).await.into_result()?;
        json::decode(value)
    }

    /// POSTs `body` as JSON to `url` using this executor's options.
    pub async fn post_json(&self, url: &str, body: &Value) -> FetchOutcome {
        self.execute_post(&self.options.descriptor(url), body).await
    }

    /// Runs up to `descriptor.max_attempts()` GET attempts, sleeping the
    /// constant retry delay between them.
    ///
    /// Connection, timeout, HTTP status and other transport failures are
    /// retried. A 2xx body that is not valid JSON is returned immediately.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> FetchOutcome {
        self.run(descriptor, None).await
    }

    /// Same attempt loop as [`RequestExecutor::execute`], sending a JSON POST.
    pub async fn execute_post(&self, descriptor: &RequestDescriptor, body: &Value) -> FetchOutcome {
        self.run(descriptor, Some(body)).await
    }

    async fn run(&self, descriptor: &RequestDescriptor, body: Option<&Value>) -> FetchOutcome {
        let url = descriptor.url();
        let max_attempts = descriptor.max_attempts();
        let mut attempt = 1usize;

        #[cfg(feature = "tracing")]
        let (method, endpoint) = (
            if body.is_some() { "POST" } else { "GET" },
            log_endpoint(url),
        );

        loop {
            #[cfg(feature = "tracing")]
            tracing::info!(attempt, method, endpoint, "request attempt");

            let sent = match body {
                Some(json) => {
                    self.transport
                        .post_json(url, json, descriptor.timeout())
                        .await
                }
                None => self.transport.get(url, descriptor.timeout()).await,
            };

            let error = match sent {
                Ok(response) if !response.is_error() => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(attempt, status = response.status, "success response");

                    return match decode_body(&response) {
                        Ok(data) => FetchOutcome::Success {
                            data,
                            attempts: attempt,
                        },
                        Err(error) => {
                            #[cfg(feature = "tracing")]
                            tracing::error!(attempt, %error, "response body is not valid JSON");

                            FetchOutcome::Failure {
                                error,
                                attempts: attempt,
                            }
                        }
                    };
                }
                Ok(response) => FetchError::Http {
                    status: response.status,
                    body: response.body,
                },
                Err(err) => classify_transport(err, descriptor.timeout()),
            };

            #[cfg(feature = "tracing")]
            tracing::error!(attempt, %error, "request attempt failed");

            if attempt >= max_attempts {
                #[cfg(feature = "tracing")]
                tracing::error!(attempts = attempt, %error, endpoint, "giving up");

                return FetchOutcome::Failure {
                    error,
                    attempts: attempt,
                };
            }

            wait_before_retry(descriptor.retry_delay()).await;
            attempt += 1;
        }
    }
}

fn classify_transport(err: TransportError, timeout: Duration) -> FetchError {
    match err {
        TransportError::Connect(message) => FetchError::Connection(message),
        TransportError::Timeout => FetchError::Timeout {
            timeout_ms: duration_ms(timeout),
        },
        TransportError::Other(message) => FetchError::Transport(message),
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Decodes a success body. An empty body is a valid, empty result.
fn decode_body(response: &RawResponse) -> Result<Value> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|err| {
        FetchError::Decode(format!(
            "invalid JSON in {} response: {err}",
            response.status
        ))
    })
}

/// URL without its query string; queries may carry API keys.
#[cfg(feature = "tracing")]
fn log_endpoint(url: &str) -> &str {
    url.split_once('?').map_or(url, |(endpoint, _)| endpoint)
}

async fn wait_before_retry(delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::info!(delay_ms = duration_ms(delay), "retrying");

    if !delay.is_zero() {
        sleep(delay).await;
    }
}
