use std::time::Duration;

use crate::{JsonRpcError, Result};

pub const ENV_SERVICE_ADDR: &str = "JSONRPC_SERVICE_ADDR";
pub const ENV_MAX_RETRIES: &str = "JSONRPC_MAX_RETRIES";
pub const ENV_RETRY_INTERVAL_MS: &str = "JSONRPC_RETRY_INTERVAL_MS";

/// Default pause between attempts when none is configured.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Address and retry policy of a JSON-RPC service.
///
/// Fixed at client construction; the client never mutates it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceEndpoint {
    /// Full service URL, e.g. `http://127.0.0.1:8080/rpc`.
    pub address: String,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Fixed pause between attempts (no backoff, no jitter).
    pub retry_interval: Duration,
}

impl ServiceEndpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Reads the endpoint from `JSONRPC_*` environment variables.
    ///
    /// See [`ServiceClient::from_env`](crate::ServiceClient::from_env).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup(ENV_SERVICE_ADDR)
            .ok_or_else(|| missing(ENV_SERVICE_ADDR))?
            .trim()
            .to_owned();
        if address.is_empty() {
            return Err(JsonRpcError::Config(format!(
                "{ENV_SERVICE_ADDR} is set but empty"
            )));
        }

        let mut endpoint = Self::new(address);
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            endpoint.max_retries = parse_number(ENV_MAX_RETRIES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_INTERVAL_MS) {
            endpoint.retry_interval =
                Duration::from_millis(parse_number(ENV_RETRY_INTERVAL_MS, &raw)?);
        }
        Ok(endpoint)
    }

    /// Upper bound of HTTP attempts a single call can make.
    pub fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            address: String::new(),
            max_retries: 0,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

fn missing(name: &str) -> JsonRpcError {
    JsonRpcError::Config(format!("missing {name} environment variable"))
}

fn parse_number<N: std::str::FromStr>(name: &str, raw: &str) -> Result<N> {
    raw.trim().parse().map_err(|_| {
        JsonRpcError::Config(format!(
            "{name} must be a non-negative integer, got '{raw}'"
        ))
    })
}
