// src/mcp/tools/mod.rs
// Shared contract for every exposed operation:
// validate -> build params -> dispatch -> normalize

pub mod api;
pub mod diagnostics;
pub mod plc;
pub mod program;

use crate::error::{BridgeError, Result};
use crate::mcp::BridgeServer;
use crate::rpc::types::RpcResponse;
use serde::Serialize;
use serde_json::Value;

/// Whether an operation reads the credential store before dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Required,
    NotRequired,
}

/// The one dispatch path all operations share. Validates the endpoint
/// identity, looks up the session entry for auth-requiring operations (an
/// absent entry means the request goes out unauthenticated), and performs the
/// exchange. Anonymous operations never touch the store.
pub(crate) async fn call_device(
    server: &BridgeServer,
    ip: &str,
    auth: Auth,
    method: &str,
    params: Option<Value>,
) -> Result<RpcResponse> {
    validate_ip(ip)?;
    let entry = match auth {
        Auth::Required => server.store.get(ip).await,
        Auth::NotRequired => None,
    };
    server.client.call(ip, entry.as_ref(), method, params).await
}

/// Success payload pretty-printed; anything else (device error, or a reply
/// with neither discriminant) surfaces the full response verbatim as the
/// error string.
pub(crate) fn normalize(response: &RpcResponse) -> std::result::Result<String, String> {
    match &response.result {
        Some(result) => Ok(pretty(result)),
        None => Err(pretty(response)),
    }
}

/// Dotted-quad IPv4: four octets, each 0-255
pub(crate) fn validate_ip(ip: &str) -> Result<()> {
    let octets: Vec<&str> = ip.split('.').collect();
    let well_formed = octets.len() == 4
        && octets
            .iter()
            .all(|o| !o.is_empty() && o.len() <= 3 && o.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(BridgeError::InvalidInput(format!(
            "invalid PLC IP address: {ip:?}"
        )));
    }
    if octets.iter().any(|o| o.parse::<u16>().is_ok_and(|v| v > 255)) {
        return Err(BridgeError::InvalidInput(format!(
            "IP address octets must be 0-255: {ip:?}"
        )));
    }
    Ok(())
}

pub(crate) fn require_nonempty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BridgeError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::credentials::CredentialStore;
    use crate::mcp::BridgeServer;
    use crate::rpc::{DeviceClient, RequestIds};
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    pub(crate) const TOKEN: &str = "tok-1";

    /// Scripted device: enough of the Web API to drive the session flows
    async fn device(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let token = headers.get("x-auth-token").and_then(|v| v.to_str().ok());
        let params = body["params"].clone();
        let authorized = token == Some(TOKEN);

        let reply = match body["method"].as_str().unwrap_or_default() {
            "Api.Login" => {
                if params["user"] == json!("admin") && params["password"] == json!("secret") {
                    json!({"result": {"token": TOKEN}})
                } else {
                    json!({"error": {"code": 100, "message": "Login failed"}})
                }
            }
            "Api.Logout" => json!({"result": true}),
            "Api.Ping" => json!({"result": "cpu-uid-0001"}),
            "Plc.CreateBackup" => {
                if authorized {
                    json!({"result": "TICKET123"})
                } else {
                    json!({"error": {"code": 2, "message": "Permission denied"}})
                }
            }
            "PlcProgram.Read" => {
                if authorized {
                    json!({"result": 42})
                } else {
                    json!({"error": {"code": 2, "message": "Permission denied"}})
                }
            }
            // Echo the params so tests can assert the exact wire shape
            "PlcProgram.Browse" | "PlcProgram.Write" | "Alarms.Browse"
            | "DiagnosticBuffer.Browse" | "Plc.SetSystemTime" => json!({"result": params}),
            "Plc.RequestChangeOperatingMode" | "Api.ChangePassword" | "Api.CloseTicket" => {
                json!({"result": true})
            }
            _ => json!({"error": {"code": -32601, "message": "Method not found"}}),
        };

        let mut response = json!({"jsonrpc": "2.0", "id": body["id"]});
        let map = response.as_object_mut().unwrap();
        for (k, v) in reply.as_object().unwrap() {
            map.insert(k.clone(), v.clone());
        }
        Json(response)
    }

    /// Endpoint identity tool tests use to address the mock device
    pub(crate) const DEVICE_IP: &str = "127.0.0.1";

    /// Mock device on 127.0.0.1 plus a server whose client is pinned to the
    /// device's port over plain HTTP. Tools address it as `DEVICE_IP`.
    pub(crate) async fn mock_bridge() -> BridgeServer {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let app = Router::new().route("/api/jsonrpc", post(device));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let store = Arc::new(CredentialStore::new());
        let client = Arc::new(DeviceClient::over_http(
            Arc::new(RequestIds::new()),
            port,
            Duration::from_secs(5),
        ));
        BridgeServer::new(store, client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dotted_quads() {
        assert!(validate_ip("192.168.0.1").is_ok());
        assert!(validate_ip("0.0.0.0").is_ok());
        assert!(validate_ip("255.255.255.255").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for ip in ["", "192.168.0", "192.168.0.1.5", "a.b.c.d", "1.2.3.", "1..2.3"] {
            assert!(validate_ip(ip).is_err(), "accepted {ip:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert!(validate_ip("256.0.0.1").is_err());
        assert!(validate_ip("1.2.3.999").is_err());
    }

    #[test]
    fn nonempty_guard_names_the_field() {
        let err = require_nonempty("username", "").unwrap_err();
        assert!(err.to_string().contains("username"));
        assert!(require_nonempty("username", "admin").is_ok());
    }
}
