/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum JsonRpcError {
    /// Call arguments could not be serialized into a request body.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
    /// Network, request construction or body read error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// Transient HTTP status (429, 500, 502, 503, 504) with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Error value reported by the remote service in the `error` field.
    #[error("rpc error: {0}")]
    Rpc(serde_json::Value),
    /// Response was not a valid JSON-RPC envelope or had the wrong shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// The wait between attempts was cancelled by the caller.
    #[error("call cancelled while waiting to retry")]
    Cancelled,
    /// Invalid or missing client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`JsonRpcError`] driving the retry decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Encode,
    Transport,
    Decode,
    Cancelled,
    Config,
}

impl JsonRpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encode(_) => ErrorKind::Encode,
            Self::Transport(_) | Self::Http { .. } => ErrorKind::Transport,
            Self::Rpc(_) | Self::Decode(_) => ErrorKind::Decode,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
