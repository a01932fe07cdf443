//! JSON-RPC 2.0 envelope used by the Zabbix API.
//!
//! # Design
//! The envelope is split from the transport the same way requests are split
//! from responses: `encode_request` produces the body for one call and
//! `decode_response` consumes the body that came back. A response carrying an
//! `error` member never reaches the caller as a successful `RpcResponse`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
    id: u64,
}

/// Error member of a failed JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl From<RpcErrorObject> for ApiError {
    fn from(e: RpcErrorObject) -> Self {
        ApiError::Rpc {
            code: e.code,
            message: e.message,
            data: e.data.unwrap_or_default(),
        }
    }
}

/// A successful JSON-RPC response. `result` is left untyped until the
/// calling operation decodes it.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
    #[serde(default)]
    pub id: Option<u64>,
}

impl RpcResponse {
    /// Decode `result` into `T`, reporting a shape mismatch as
    /// `MalformedResponse`.
    pub fn decode_result<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        T::deserialize(&self.result).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

/// Serialize one call into a request body.
pub fn encode_request<P: Serialize>(
    method: &str,
    params: P,
    auth: Option<&str>,
    id: u64,
) -> Result<String, ApiError> {
    let request = RpcRequest {
        jsonrpc: JSONRPC_VERSION,
        method,
        params,
        auth,
        id,
    };
    serde_json::to_string(&request).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Parse a response body, turning an `error` member into `ApiError::Rpc`.
pub fn decode_response(body: &str) -> Result<RpcResponse, ApiError> {
    let mut response: RpcResponse =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if let Some(error) = response.error.take() {
        return Err(error.into());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_request_includes_auth_when_present() {
        let body = encode_request("httptest.get", json!({"output": "extend"}), Some("abc"), 7).unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "httptest.get");
        assert_eq!(value["params"]["output"], "extend");
        assert_eq!(value["auth"], "abc");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn encode_request_omits_missing_auth() {
        let body = encode_request("httptest.delete", ["1"], None, 1).unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value.get("auth").is_none());
        assert_eq!(value["params"], json!(["1"]));
    }

    #[test]
    fn decode_response_returns_result() {
        let response =
            decode_response(r#"{"jsonrpc":"2.0","result":{"httptestids":["5"]},"id":3}"#).unwrap();
        assert_eq!(response.id, Some(3));
        assert_eq!(response.result["httptestids"][0], "5");
    }

    #[test]
    fn decode_response_surfaces_error_member() {
        let err = decode_response(
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params.","data":"bad"},"id":1}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Rpc { code, message, data } => {
                assert_eq!(code, -32602);
                assert_eq!(message, "Invalid params.");
                assert_eq!(data, "bad");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_response_accepts_null_error_data() {
        let err = decode_response(
            r#"{"jsonrpc":"2.0","error":{"code":-32500,"message":"Application error.","data":null},"id":1}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Rpc { code, data, .. } => {
                assert_eq!(code, -32500);
                assert!(data.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_response_rejects_non_json() {
        let err = decode_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn decode_result_reports_malformed_shape() {
        let response = decode_response(r#"{"jsonrpc":"2.0","result":true,"id":1}"#).unwrap();
        let err = response.decode_result::<Vec<String>>().unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }
}
