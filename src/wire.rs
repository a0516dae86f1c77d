use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 1.0 request. `params` always wraps the call arguments in a
/// one-element array.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, A: ?Sized> {
    pub method: &'a str,
    pub params: [&'a A; 1],
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}
