// src/rpc/client.rs
// The single network-facing primitive: one request/response exchange
// with a PLC Web API endpoint

use crate::credentials::CredentialEntry;
use crate::error::{BridgeError, Result};
use crate::rpc::ids::RequestIds;
use crate::rpc::types::{AUTH_HEADER, JSONRPC_VERSION, RpcRequest, RpcResponse};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Round-trip bound for a single exchange
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the device JSON-RPC endpoint. PLCs ship self-signed
/// certificates, so TLS verification is disabled; the bridge is scoped to
/// private local networks.
pub struct DeviceClient {
    http: reqwest::Client,
    ids: Arc<RequestIds>,
    scheme: &'static str,
    port: Option<u16>,
    timeout: Duration,
}

impl DeviceClient {
    pub fn new(ids: Arc<RequestIds>) -> Self {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            ids,
            scheme: "https",
            port: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Plain-HTTP client pinned to a port, for exercising the dispatch path
    /// against local mock devices.
    #[cfg(test)]
    pub(crate) fn over_http(ids: Arc<RequestIds>, port: u16, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            ids,
            scheme: "http",
            port: Some(port),
            timeout,
        }
    }

    /// Perform exactly one correlated exchange with the endpoint at `ip`.
    ///
    /// When `auth` carries a non-empty token it is attached as the
    /// `X-Auth-Token` header; otherwise the request goes out unauthenticated.
    /// All transport failures collapse to `BridgeError::Transport`. Retry
    /// policy, if any, belongs to the caller.
    pub async fn call(
        &self,
        ip: &str,
        auth: Option<&CredentialEntry>,
        method: &str,
        params: Option<Value>,
    ) -> Result<RpcResponse> {
        let request = RpcRequest {
            id: self.ids.next(),
            jsonrpc: JSONRPC_VERSION,
            method: method.to_string(),
            params,
        };

        let mut builder = self.http.post(self.rpc_url(ip)).json(&request);
        if let Some(entry) = auth {
            if !entry.token.is_empty() {
                builder = builder.header(AUTH_HEADER, &entry.token);
            }
        }

        let response = builder.send().await.map_err(|e| {
            error!(method, ip, "request failed: {e}");
            if e.is_timeout() {
                BridgeError::Transport(format!(
                    "request to {ip} timed out after {:?}",
                    self.timeout
                ))
            } else {
                BridgeError::Transport(format!("request to {ip} failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(method, ip, "failed to read response body: {e}");
            BridgeError::Transport(format!("failed to read response from {ip}: {e}"))
        })?;

        // Devices embed structured errors in non-2xx bodies; parse anyway.
        if !status.is_success() {
            error!(method, ip, %status, "device returned non-success status: {body}");
        }

        let parsed: RpcResponse = serde_json::from_str(&body).map_err(|e| {
            error!(method, ip, "malformed response body: {e}");
            BridgeError::Transport(format!("malformed response from {ip}: {e}"))
        })?;

        if let Some(errors) = &parsed.errors {
            error!(method, ip, "device reported errors: {errors}");
        }

        Ok(parsed)
    }

    fn rpc_url(&self, ip: &str) -> String {
        match self.port {
            Some(port) => format!("{}://{ip}:{port}/api/jsonrpc", self.scheme),
            None => format!("{}://{ip}/api/jsonrpc", self.scheme),
        }
    }
}
