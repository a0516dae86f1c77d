//! `jsonrpc-retry` is an async JSON-RPC 1.0 over HTTP client.
//!
//! A [`ServiceClient`] posts `{"method", "params": [args], "id"}` to a fixed
//! address and decodes `{"result", "error", "id"}` into a caller-chosen type:
//! - [`ServiceClient::call`]
//! - [`ServiceClient::call_into`]
//! - [`ServiceClient::call_with_cancel`]
//!
//! Transport failures are retried with a fixed pause; protocol failures are
//! returned immediately.

mod client;
mod codec;
mod error;
mod observer;
mod options;
mod wire;

pub use client::ServiceClient;
pub use error::{ErrorKind, JsonRpcError};
pub use observer::{CallObserver, NoopObserver, TracingObserver};
pub use options::{
    ServiceEndpoint, DEFAULT_RETRY_INTERVAL, ENV_MAX_RETRIES, ENV_RETRY_INTERVAL_MS,
    ENV_SERVICE_ADDR,
};
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, JsonRpcError>;
