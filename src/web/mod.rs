// src/web/mod.rs
// HTTP layer: status page and the MCP streamable HTTP transport

pub mod mcp_http;
pub mod status;

use crate::credentials::CredentialStore;
use crate::rpc::DeviceClient;
use axum::{Router, routing::get};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CredentialStore>,
    pub client: Arc<DeviceClient>,
    pub started: Instant,
}

/// Router hosting /health, the /status page and the MCP service at /mcp
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mcp_service = mcp_http::create_mcp_service(state.clone());

    Router::new()
        .route("/health", get(health))
        .route("/status", get(status::page))
        .nest_service("/mcp", mcp_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
