// src/web/mcp_http.rs
// MCP over HTTP (Streamable HTTP transport)

use crate::mcp::BridgeServer;
use crate::web::AppState;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Create the MCP HTTP service. Every session gets its own server instance
/// over the shared store and client.
pub fn create_mcp_service(state: AppState) -> StreamableHttpService<BridgeServer, LocalSessionManager> {
    let store = state.store.clone();
    let client = state.client.clone();

    let service_factory = move || Ok(BridgeServer::new(store.clone(), client.clone()));

    let session_manager = Arc::new(LocalSessionManager::default());

    let config = StreamableHttpServerConfig {
        sse_keep_alive: Some(std::time::Duration::from_secs(15)),
        sse_retry: Some(std::time::Duration::from_secs(3)),
        stateful_mode: true,
        cancellation_token: CancellationToken::new(),
    };

    StreamableHttpService::new(service_factory, session_manager, config)
}
