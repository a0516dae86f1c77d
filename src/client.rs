use std::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{codec, CallObserver, JsonRpcError, Result, ServiceEndpoint, TracingObserver};

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

#[derive(Clone)]
/// JSON-RPC 1.0 client bound to one service address.
///
/// Transport failures are retried up to
/// [`ServiceEndpoint::max_retries`] times with a fixed pause in between.
/// Protocol failures (bad JSON, server-reported errors, shape mismatch) are
/// returned on first occurrence.
///
/// Clones share the HTTP connection pool and the request id sequence.
pub struct ServiceClient {
    http: reqwest::Client,
    endpoint: ServiceEndpoint,
    next_id: Arc<AtomicU64>,
    observer: Arc<dyn CallObserver>,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Creates a client for the service at `address` (full URL with port).
    pub fn new(address: impl Into<String>, max_retries: usize, retry_interval: Duration) -> Self {
        Self::from_endpoint(
            ServiceEndpoint::new(address)
                .with_max_retries(max_retries)
                .with_retry_interval(retry_interval),
        )
    }

    pub fn from_endpoint(endpoint: ServiceEndpoint) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            next_id: Arc::new(AtomicU64::new(1)),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `JSONRPC_SERVICE_ADDR` — full service URL (required)
    /// - `JSONRPC_MAX_RETRIES` — retries after the first attempt (default 0)
    /// - `JSONRPC_RETRY_INTERVAL_MS` — pause between attempts (default 250)
    pub fn from_env() -> Result<Self> {
        ServiceEndpoint::from_env().map(Self::from_endpoint)
    }

    /// Replaces the HTTP client, e.g. one built with a request timeout.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Routes diagnostic events to `observer` instead of `tracing`.
    pub fn with_observer(mut self, observer: impl CallObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Calls `method` with `args` and decodes the result into `T`.
    pub async fn call<T, A>(&self, method: &str, args: &A) -> Result<T>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        self.call_with_cancel(method, args, &CancellationToken::new())
            .await
    }

    /// Like [`ServiceClient::call`], but writes the result into `out`.
    ///
    /// `out` is only assigned after a successful decode; on error it keeps its
    /// previous value.
    pub async fn call_into<T, A>(&self, method: &str, args: &A, out: &mut T) -> Result<()>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        *out = self.call(method, args).await?;
        Ok(())
    }

    /// Like [`ServiceClient::call`], with a token that aborts the wait
    /// between attempts.
    ///
    /// Cancelling never interrupts an HTTP exchange already in flight; the
    /// call observes the token only while waiting to retry and then returns
    /// [`JsonRpcError::Cancelled`].
    pub async fn call_with_cancel<T, A>(
        &self,
        method: &str,
        args: &A,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observer.call_started(method, id);

        let outcome = match codec::encode(method, args, id) {
            Ok(body) => self.send_with_retry(method, &body, cancel).await,
            Err(err) => Err(err),
        };

        if let Err(err) = &outcome {
            self.observer.call_failed(method, err);
        }
        outcome
    }

    async fn send_with_retry<T>(
        &self,
        method: &str,
        body: &[u8],
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut remaining = self.endpoint.max_retries;
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            self.observer
                .attempt_started(method, &self.endpoint.address, attempt);

            let err = match self.post(body).await {
                Ok(response_body) => {
                    return match codec::decode(&response_body) {
                        Ok(value) => {
                            self.observer.call_succeeded(method, attempt);
                            Ok(value)
                        }
                        Err(err) => {
                            self.observer.decode_failed(method, &response_body, &err);
                            Err(err)
                        }
                    };
                }
                Err(err) => err,
            };

            self.observer.attempt_failed(method, attempt, &err);
            if !err.is_retryable() || remaining == 0 {
                return Err(err);
            }

            self.observer
                .retry_scheduled(method, remaining, self.endpoint.retry_interval);
            remaining -= 1;
            self.wait_before_retry(cancel).await?;
        }
    }

    /// Posts one request and reads the full response body.
    async fn post(&self, body: &[u8]) -> Result<Vec<u8>> {
        let response = self
            .http
            .post(&self.endpoint.address)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body.to_vec())
            .send()
            .await
            .map_err(JsonRpcError::Transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(JsonRpcError::Transport)?;

        if should_retry_status(status) {
            return Err(JsonRpcError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }

    /// Waits exactly the configured interval unless `cancel` fires first.
    async fn wait_before_retry(&self, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(JsonRpcError::Cancelled),
            _ = sleep(self.endpoint.retry_interval) => Ok(()),
        }
    }
}

fn should_retry_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
