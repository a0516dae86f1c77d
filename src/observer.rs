//! Diagnostic hooks for the retry loop.
//!
//! [`ServiceClient`](crate::ServiceClient) reports every step of a call to a
//! [`CallObserver`] instead of logging directly. The default
//! [`TracingObserver`] turns the events into `tracing` records; tests inject
//! their own observer to count attempts.

use std::time::Duration;

use crate::JsonRpcError;

/// Receives diagnostic events from a call. All methods default to no-ops.
pub trait CallObserver: Send + Sync {
    /// A call was started and its request encoded.
    fn call_started(&self, _method: &str, _id: u64) {}

    /// Attempt number `attempt` (1-based) is about to be posted.
    fn attempt_started(&self, _method: &str, _address: &str, _attempt: usize) {}

    /// An attempt failed with a retryable transport error.
    fn attempt_failed(&self, _method: &str, _attempt: usize, _error: &JsonRpcError) {}

    /// The client will wait `delay` and try again; `remaining` retries are left
    /// before this one is spent.
    fn retry_scheduled(&self, _method: &str, _remaining: usize, _delay: Duration) {}

    /// A response body was received but could not be turned into a result.
    fn decode_failed(&self, _method: &str, _body: &[u8], _error: &JsonRpcError) {}

    /// The call ended with a final error.
    fn call_failed(&self, _method: &str, _error: &JsonRpcError) {}

    /// The call ended with a decoded result after `attempts` attempts.
    fn call_succeeded(&self, _method: &str, _attempts: usize) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {}

/// Emits events through the `tracing` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn call_started(&self, method: &str, id: u64) {
        tracing::debug!(method, id, "json-rpc client call");
    }

    fn attempt_started(&self, method: &str, address: &str, attempt: usize) {
        tracing::trace!(method, address, attempt, "posting request");
    }

    fn attempt_failed(&self, method: &str, attempt: usize, error: &JsonRpcError) {
        tracing::warn!(method, attempt, error = %error, "attempt failed");
    }

    fn retry_scheduled(&self, method: &str, remaining: usize, delay: Duration) {
        tracing::trace!(method, remaining, delay = ?delay, "reconnecting");
    }

    fn decode_failed(&self, method: &str, body: &[u8], error: &JsonRpcError) {
        tracing::error!(
            method,
            body = %String::from_utf8_lossy(body),
            error = %error,
            "error while decoding response"
        );
    }

    fn call_failed(&self, method: &str, error: &JsonRpcError) {
        tracing::error!(method, kind = ?error.kind(), error = %error, "call failed");
    }

    fn call_succeeded(&self, method: &str, attempts: usize) {
        tracing::debug!(method, attempts, "call succeeded");
    }
}
