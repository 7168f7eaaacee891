// src/mcp/tools/diagnostics.rs
// Alarm, diagnostic buffer and project language operations

use super::{Auth, call_device, normalize, require_nonempty};
use crate::mcp::{BridgeServer, BrowseFilters, FilterMode};
use serde_json::{Map, Value, json};

const DEFAULT_LANGUAGE: &str = "en-US";

fn default_alarm_filters() -> BrowseFilters {
    BrowseFilters {
        mode: FilterMode::Include,
        attributes: vec![
            "alarm_text".to_string(),
            "status".to_string(),
            "timestamp".to_string(),
        ],
    }
}

fn default_diagnostic_filters() -> BrowseFilters {
    BrowseFilters {
        mode: FilterMode::Include,
        attributes: vec![
            "short_text".to_string(),
            "long_text".to_string(),
            "help_text".to_string(),
        ],
    }
}

/// Browse active alarms. With an `alarm_id`, only `count` may be combined as
/// a further filter (device rule; violation yields device error 801).
pub async fn alarms_browse(
    server: &BridgeServer,
    ip: String,
    language: Option<String>,
    count: Option<u32>,
    alarm_id: Option<String>,
    filters: Option<BrowseFilters>,
) -> Result<String, String> {
    let language = language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    require_nonempty("language", &language).map_err(String::from)?;
    let filters = filters.unwrap_or_else(default_alarm_filters);

    let mut params = Map::new();
    params.insert("language".to_string(), json!(language));
    if let Some(count) = count {
        params.insert("count".to_string(), json!(count));
    }
    if let Some(alarm_id) = alarm_id.filter(|id| !id.is_empty()) {
        params.insert("alarm_id".to_string(), json!(alarm_id));
    }
    params.insert(
        "filters".to_string(),
        serde_json::to_value(&filters).map_err(|e| e.to_string())?,
    );

    let response = call_device(
        server,
        &ip,
        Auth::Required,
        "Alarms.Browse",
        Some(Value::Object(params)),
    )
    .await
    .map_err(String::from)?;
    normalize(&response)
}

pub async fn alarms_acknowledge(
    server: &BridgeServer,
    ip: String,
    id: String,
) -> Result<String, String> {
    require_nonempty("id", &id).map_err(String::from)?;

    let params = json!({ "id": id });
    let response = call_device(server, &ip, Auth::Required, "Alarms.Acknowledge", Some(params))
        .await
        .map_err(String::from)?;
    normalize(&response)
}

pub async fn diagnostic_buffer_browse(
    server: &BridgeServer,
    ip: String,
    language: Option<String>,
    count: Option<u32>,
    filters: Option<BrowseFilters>,
) -> Result<String, String> {
    let language = language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    require_nonempty("language", &language).map_err(String::from)?;
    let filters = filters.unwrap_or_else(default_diagnostic_filters);

    let mut params = Map::new();
    params.insert("language".to_string(), json!(language));
    if let Some(count) = count {
        params.insert("count".to_string(), json!(count));
    }
    params.insert(
        "filters".to_string(),
        serde_json::to_value(&filters).map_err(|e| e.to_string())?,
    );

    let response = call_device(
        server,
        &ip,
        Auth::Required,
        "DiagnosticBuffer.Browse",
        Some(Value::Object(params)),
    )
    .await
    .map_err(String::from)?;
    normalize(&response)
}

/// Project languages available for alarm and diagnostic texts
pub async fn read_languages(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::Required, "Project.ReadLanguages", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}
