// src/mcp/tools/program.rs
// PlcProgram.* operations: tag browse, read, write

use super::{Auth, call_device, normalize, require_nonempty};
use crate::error::BridgeError;
use crate::mcp::{BlockType, BridgeServer, BrowseMode, ReadMode};
use serde_json::{Map, Value, json};

/// Search tags and their metadata. `var` is required when `mode` is `var`
/// (browse a specific tag) and optional when browsing children.
pub async fn browse(
    server: &BridgeServer,
    ip: String,
    var: Option<String>,
    mode: BrowseMode,
    types: Option<Vec<BlockType>>,
) -> Result<String, String> {
    let var = var.unwrap_or_default();
    if mode == BrowseMode::Var && var.is_empty() {
        return Err(BridgeError::InvalidInput(
            "var is required when mode is \"var\"".to_string(),
        )
        .into());
    }

    let mut params = Map::new();
    params.insert("mode".to_string(), json!(mode.as_str()));
    if !var.is_empty() {
        params.insert("var".to_string(), json!(var));
    }
    if let Some(types) = types {
        if !types.is_empty() {
            let entries: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
            params.insert("type".to_string(), json!(entries));
        }
    }

    let response = call_device(
        server,
        &ip,
        Auth::Required,
        "PlcProgram.Browse",
        Some(Value::Object(params)),
    )
    .await
    .map_err(String::from)?;
    normalize(&response)
}

/// Read a single tag in the given representation (default "simple")
pub async fn read(
    server: &BridgeServer,
    ip: String,
    var: String,
    mode: Option<ReadMode>,
) -> Result<String, String> {
    require_nonempty("var", &var).map_err(String::from)?;
    let mode = mode.unwrap_or(ReadMode::Simple);

    let params = json!({ "var": var, "mode": mode.as_str() });
    let response = call_device(server, &ip, Auth::Required, "PlcProgram.Read", Some(params))
        .await
        .map_err(String::from)?;
    normalize(&response)
}

/// Write a single tag. The wire value must be a scalar; the device applies
/// its own typing and truncation rules to the stored tag.
pub async fn write(
    server: &BridgeServer,
    ip: String,
    var: String,
    value: Value,
) -> Result<String, String> {
    require_nonempty("var", &var).map_err(String::from)?;
    if !(value.is_boolean() || value.is_number() || value.is_string()) {
        return Err(BridgeError::InvalidInput(
            "value must be a boolean, number or string".to_string(),
        )
        .into());
    }

    let params = json!({ "var": var, "value": value, "mode": "simple" });
    let response = call_device(server, &ip, Auth::Required, "PlcProgram.Write", Some(params))
        .await
        .map_err(String::from)?;
    normalize(&response)
}
