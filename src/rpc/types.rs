// src/rpc/types.rs
// Wire envelope and response shapes for the PLC Web API

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Header carrying the session token on authenticated requests
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Outgoing request envelope. `params` is omitted from the body entirely for
/// parameterless methods.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub id: u64,
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Structured error reported by the device, passed through to callers verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Device response. Exactly one of `result`/`error` is populated on a
/// well-formed reply; a response carrying neither is treated as an error by
/// callers. `extra` keeps unmodeled members (`jsonrpc`, `id`, ...) so error
/// responses re-serialize unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_omitted_when_absent() {
        let request = RpcRequest {
            id: 7,
            jsonrpc: JSONRPC_VERSION,
            method: "Api.Ping".to_string(),
            params: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"id": 7, "jsonrpc": "2.0", "method": "Api.Ping"}));
    }

    #[test]
    fn error_response_round_trips_unchanged() {
        let wire = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "error": {"code": 2, "message": "Permission denied"}
        });
        let parsed: RpcResponse = serde_json::from_value(wire.clone()).unwrap();
        assert!(parsed.result.is_none());
        assert_eq!(parsed.error.as_ref().unwrap().code, 2);
        assert_eq!(serde_json::to_value(&parsed).unwrap(), wire);
    }

    #[test]
    fn empty_response_has_neither_discriminant() {
        let parsed: RpcResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.result.is_none());
        assert!(parsed.error.is_none());
    }
}
