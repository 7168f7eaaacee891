// tests/integration.rs
// Crate-level behavior through the public API

use s7_bridge::config;
use s7_bridge::credentials::{CredentialEntry, CredentialStore};
use s7_bridge::mcp::{BridgeServer, tools};
use s7_bridge::rpc::{DeviceClient, RequestIds};
use std::io::Write;
use std::sync::Arc;

fn entry(token: &str) -> CredentialEntry {
    CredentialEntry {
        user: "admin".to_string(),
        password: "secret".to_string(),
        token: token.to_string(),
    }
}

#[test]
fn request_ids_are_sequential_from_one() {
    let ids = RequestIds::new();
    for expected in 1..=500 {
        assert_eq!(ids.next(), expected);
    }
    ids.reset();
    assert_eq!(ids.next(), 1);
}

#[tokio::test]
async fn session_lifecycle_per_endpoint() {
    let store = CredentialStore::new();

    store.set("192.168.0.1", entry("tok-a")).await;
    store.set("192.168.0.2", entry("tok-b")).await;
    assert_eq!(store.len().await, 2);
    assert_eq!(store.get("192.168.0.1").await.unwrap().token, "tok-a");

    // A new login replaces the session wholesale
    store.set("192.168.0.1", entry("tok-c")).await;
    assert_eq!(store.get("192.168.0.1").await.unwrap().token, "tok-c");
    assert_eq!(store.len().await, 2);

    // Logout is idempotent and endpoint-local
    assert!(store.remove("192.168.0.1").await);
    assert!(!store.remove("192.168.0.1").await);
    assert!(!store.contains("192.168.0.1").await);
    assert!(store.contains("192.168.0.2").await);
}

#[test]
fn config_file_lists_endpoints() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"plcIpAddresses": ["192.168.0.1", "192.168.0.2", ""], "plcNames": ["Press line"]}}"#
    )
    .unwrap();

    let plcs = config::load_from_file(file.path()).unwrap();
    assert_eq!(plcs.len(), 2);
    assert_eq!(plcs[0].plc_name, "Press line");
    assert_eq!(plcs[0].plc_ip_address, "192.168.0.1");
    assert_eq!(plcs[1].plc_name, "PLC_2");
}

#[tokio::test]
async fn invalid_input_is_rejected_without_any_network_call() {
    let store = Arc::new(CredentialStore::new());
    let client = Arc::new(DeviceClient::new(Arc::new(RequestIds::new())));
    let server = BridgeServer::new(store, client);

    let err = tools::api::ping(&server, "999.168.0.1".to_string())
        .await
        .unwrap_err();
    assert!(err.contains("0-255"));

    let err = tools::api::login(
        &server,
        "192.168.0.1.1".to_string(),
        "admin".to_string(),
        "secret".to_string(),
    )
    .await
    .unwrap_err();
    assert!(err.contains("invalid PLC IP address"));
}
