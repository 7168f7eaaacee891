// src/config/mod.rs
// PLC inventory from /cfg-data/config.json or environment variables

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

const CONFIG_PATH: &str = "/cfg-data/config.json";

/// One configured PLC: display name plus its endpoint identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlcEndpoint {
    pub plc_name: String,
    pub plc_ip_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    plc_ip_addresses: Vec<String>,
    #[serde(default)]
    plc_names: Vec<String>,
}

/// The configured PLC list. Prefers the mounted config file; falls back to
/// `PLC_IP_ADDRESSES` / `PLC_NAMES` environment variables. Never fails: an
/// unreadable or malformed source degrades to whatever the fallback yields.
pub fn available_plcs() -> Vec<PlcEndpoint> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        match load_from_file(path) {
            Ok(plcs) => return plcs,
            Err(e) => {
                warn!(path = %path.display(), "failed to read PLC config file: {e}");
            }
        }
    }
    from_env()
}

/// Parse a config file of the form
/// `{"plcIpAddresses": ["192.168.0.1"], "plcNames": ["Press line"]}`.
pub fn load_from_file(path: &Path) -> Result<Vec<PlcEndpoint>> {
    let data = std::fs::read_to_string(path)?;
    let config: ConfigFile = serde_json::from_str(&data)?;
    Ok(pair(&config.plc_ip_addresses, &config.plc_names))
}

fn from_env() -> Vec<PlcEndpoint> {
    let addresses = split_csv(&std::env::var("PLC_IP_ADDRESSES").unwrap_or_default());
    let names = split_csv(&std::env::var("PLC_NAMES").unwrap_or_default());
    pair(&addresses, &names)
}

fn split_csv(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}

/// Pair addresses with names positionally. Blank addresses are dropped;
/// missing or blank names fall back to `PLC_{i}`.
fn pair(addresses: &[String], names: &[String]) -> Vec<PlcEndpoint> {
    addresses
        .iter()
        .enumerate()
        .filter(|(_, ip)| !ip.trim().is_empty())
        .map(|(i, ip)| PlcEndpoint {
            plc_name: names
                .get(i)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("PLC_{}", i + 1)),
            plc_ip_address: ip.trim().to_string(),
        })
        .collect()
}
