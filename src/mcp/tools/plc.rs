// src/mcp/tools/plc.rs
// Plc.* operations: operating mode, system time, configuration backup

use super::{Auth, call_device, normalize, pretty};
use crate::error::BridgeError;
use crate::mcp::{BridgeServer, OperatingMode};
use serde_json::json;

pub async fn read_operating_mode(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::Required, "Plc.ReadOperatingMode", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

/// Request RUN or STOP. The device only acknowledges the request; the actual
/// transition is reported by a later read of the operating mode.
pub async fn request_change_operating_mode(
    server: &BridgeServer,
    ip: String,
    mode: OperatingMode,
) -> Result<String, String> {
    let params = json!({ "mode": mode.as_str() });
    let response = call_device(
        server,
        &ip,
        Auth::Required,
        "Plc.RequestChangeOperatingMode",
        Some(params),
    )
    .await
    .map_err(String::from)?;

    match &response.result {
        Some(result) => Ok(pretty(&json!({ "NewOperatingModeAccepted": result }))),
        None => Err(pretty(&response)),
    }
}

pub async fn read_system_time(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::Required, "Plc.ReadSystemTime", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

/// Set the CPU system time from an RFC 3339 / ISO 8601 timestamp
pub async fn set_system_time(
    server: &BridgeServer,
    ip: String,
    timestamp: String,
) -> Result<String, String> {
    if chrono::DateTime::parse_from_rfc3339(&timestamp).is_err() {
        return Err(BridgeError::InvalidInput(format!(
            "timestamp must be an ISO 8601 datetime: {timestamp:?}"
        ))
        .into());
    }

    let params = json!({ "timestamp": timestamp });
    let response = call_device(server, &ip, Auth::Required, "Plc.SetSystemTime", Some(params))
        .await
        .map_err(String::from)?;
    normalize(&response)
}

/// Request a backup ticket. The ticket is redeemed against the device's
/// ticket endpoint, so the answer carries a ready-made download URL.
pub async fn create_backup(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::Required, "Plc.CreateBackup", None)
        .await
        .map_err(String::from)?;

    match &response.result {
        Some(result) => {
            let ticket = result.as_str().unwrap_or_default();
            Ok(pretty(&json!({
                "ticket_id": result,
                "download_url": format!("https://{ip}/api/ticket?id={ticket}"),
            })))
        }
        None => Err(pretty(&response)),
    }
}
