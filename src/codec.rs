use serde::{de::DeserializeOwned, Serialize};

use crate::{
    wire::{RpcRequest, RpcResponse},
    JsonRpcError,
};

/// Serializes a JSON-RPC 1.0 request body: `{"method", "params": [args], "id"}`.
pub(crate) fn encode<A>(method: &str, args: &A, id: u64) -> Result<Vec<u8>, JsonRpcError>
where
    A: Serialize + ?Sized,
{
    let request = RpcRequest {
        method,
        params: [args],
        id,
    };
    serde_json::to_vec(&request).map_err(JsonRpcError::Encode)
}

/// Decodes a JSON-RPC 1.0 response body into `T`.
///
/// A non-null `error` field wins over any `result`. A null `result` without
/// an error is rejected, so callers always receive a value the service
/// actually produced.
pub(crate) fn decode<T>(body: &[u8]) -> Result<T, JsonRpcError>
where
    T: DeserializeOwned,
{
    let response: RpcResponse = serde_json::from_slice(body)
        .map_err(|err| JsonRpcError::Decode(format!("invalid response JSON: {err}")))?;

    if let Some(error) = response.error {
        return Err(JsonRpcError::Rpc(error));
    }

    let result = response
        .result
        .ok_or_else(|| JsonRpcError::Decode("unexpected null result".to_owned()))?;

    serde_json::from_value(result)
        .map_err(|err| JsonRpcError::Decode(format!("result shape mismatch: {err}")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize, Serializer};
    use serde_json::{json, Value};

    use super::{decode, encode};
    use crate::{ErrorKind, JsonRpcError};

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported value"))
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sum {
        total: i64,
    }

    #[test]
    fn encode_wraps_args_in_params_array() {
        let body = encode("Arith.Add", &json!({"a": 1, "b": 2}), 7).expect("must encode");
        let value: Value = serde_json::from_slice(&body).expect("must be JSON");
        assert_eq!(
            value,
            json!({"method": "Arith.Add", "params": [{"a": 1, "b": 2}], "id": 7})
        );
    }

    #[test]
    fn encode_accepts_unsized_args() {
        let body = encode("Echo.Say", "hello", 1).expect("must encode");
        let value: Value = serde_json::from_slice(&body).expect("must be JSON");
        assert_eq!(value["params"], json!(["hello"]));
    }

    #[test]
    fn encode_failure_is_encode_error() {
        let err = encode("Broken.Call", &Unserializable, 1).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Encode);
    }

    #[test]
    fn encode_rejects_non_string_map_keys() {
        let mut args = BTreeMap::new();
        args.insert((1, 2), "pair");
        let err = encode("Map.Call", &args, 1).expect_err("must fail");
        assert!(matches!(err, JsonRpcError::Encode(_)));
    }

    #[test]
    fn decode_extracts_result() {
        let sum: Sum = decode(br#"{"result": {"total": 3}, "error": null, "id": 1}"#)
            .expect("must decode");
        assert_eq!(sum, Sum { total: 3 });
    }

    #[test]
    fn decode_server_error_is_rpc_error() {
        let err = decode::<i64>(br#"{"result": null, "error": "no such method", "id": 1}"#)
            .expect_err("must fail");
        match err {
            JsonRpcError::Rpc(value) => assert_eq!(value, json!("no such method")),
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[test]
    fn decode_error_wins_over_result() {
        let err = decode::<i64>(br#"{"result": 1, "error": {"code": 5}, "id": 1}"#)
            .expect_err("must fail");
        assert!(matches!(err, JsonRpcError::Rpc(_)));
    }

    #[test]
    fn decode_null_result_is_rejected() {
        let err = decode::<i64>(br#"{"result": null, "error": null, "id": 1}"#)
            .expect_err("must fail");
        match err {
            JsonRpcError::Decode(message) => assert!(message.contains("null result")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn decode_malformed_json() {
        let err = decode::<i64>(b"<html>oops</html>").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn decode_shape_mismatch() {
        let err = decode::<Sum>(br#"{"result": "three", "error": null, "id": 1}"#)
            .expect_err("must fail");
        match err {
            JsonRpcError::Decode(message) => assert!(message.contains("shape mismatch")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
