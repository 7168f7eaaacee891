// src/rpc/mod.rs
// JSON-RPC request layer for the PLC Web API

pub mod client;
pub mod ids;
pub mod types;

pub use client::DeviceClient;
pub use ids::RequestIds;
pub use types::{RpcError, RpcRequest, RpcResponse};
