// src/mcp/tools/api.rs
// Session lifecycle and Api.* operations

use super::{Auth, call_device, normalize, pretty, require_nonempty};
use crate::config;
use crate::credentials::CredentialEntry;
use crate::mcp::BridgeServer;
use serde_json::{Value, json};

/// Open a Web API session. The returned token is stored per endpoint and
/// attached to every subsequent authenticated call; a re-login overwrites the
/// previous session entry.
pub async fn login(
    server: &BridgeServer,
    ip: String,
    username: String,
    password: String,
) -> Result<String, String> {
    require_nonempty("username", &username).map_err(String::from)?;
    require_nonempty("password", &password).map_err(String::from)?;

    let params = json!({
        "user": &username,
        "password": &password,
        "include_web_application_cookie": true,
    });
    let response = call_device(server, &ip, Auth::NotRequired, "Api.Login", Some(params))
        .await
        .map_err(String::from)?;

    match &response.result {
        Some(result) => {
            let token = result.get("token").and_then(Value::as_str).unwrap_or_default();
            if token.is_empty() {
                return Err(format!("login response carried no token: {}", pretty(result)));
            }
            server
                .store
                .set(
                    &ip,
                    CredentialEntry {
                        user: username,
                        password,
                        token: token.to_string(),
                    },
                )
                .await;
            Ok(format!("Login succeeded; session for {ip} is authenticated."))
        }
        None => Err(pretty(&response)),
    }
}

/// End the session. The device reports success even for an unknown token, so
/// a double logout succeeds and simply finds nothing left to remove.
pub async fn logout(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::Required, "Api.Logout", None)
        .await
        .map_err(String::from)?;

    if response.result.is_some() {
        server.store.remove(&ip).await;
        Ok(format!("Logout completed; stored session for {ip} removed."))
    } else {
        Err(pretty(&response))
    }
}

pub async fn ping(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::NotRequired, "Api.Ping", None)
        .await
        .map_err(String::from)?;
    match &response.result {
        Some(result) => Ok(pretty(&json!({ "uID": result }))),
        None => Err(pretty(&response)),
    }
}

pub async fn version(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::NotRequired, "Api.Version", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

pub async fn browse(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::NotRequired, "Api.Browse", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

pub async fn get_permissions(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::Required, "Api.GetPermissions", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

pub async fn get_quantity_structures(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::NotRequired, "Api.GetQuantityStructures", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

pub async fn get_password_policy(server: &BridgeServer, ip: String) -> Result<String, String> {
    let response = call_device(server, &ip, Auth::NotRequired, "Api.GetPasswordPolicy", None)
        .await
        .map_err(String::from)?;
    normalize(&response)
}

/// Change a user account password. Requires the current password, not a
/// session token, but an existing token is still attached when present.
pub async fn change_password(
    server: &BridgeServer,
    ip: String,
    username: String,
    password: String,
    new_password: String,
) -> Result<String, String> {
    require_nonempty("username", &username).map_err(String::from)?;
    require_nonempty("password", &password).map_err(String::from)?;
    require_nonempty("new_password", &new_password).map_err(String::from)?;

    let params = json!({
        "username": username,
        "password": password,
        "new_password": new_password,
    });
    let response = call_device(server, &ip, Auth::Required, "Api.ChangePassword", Some(params))
        .await
        .map_err(String::from)?;

    match &response.result {
        Some(result) => Ok(pretty(&json!({ "NewPasswordAccepted": result }))),
        None => Err(pretty(&response)),
    }
}

/// Close a ticket belonging to the current session
pub async fn close_ticket(server: &BridgeServer, ip: String, id: String) -> Result<String, String> {
    require_nonempty("id", &id).map_err(String::from)?;

    let params = json!({ "id": &id });
    let response = call_device(server, &ip, Auth::Required, "Api.CloseTicket", Some(params))
        .await
        .map_err(String::from)?;

    match &response.result {
        Some(result) => Ok(pretty(&json!({ "ticket_id": id, "closed": result }))),
        None => Err(pretty(&response)),
    }
}

/// Configured PLC inventory; local, never touches the network
pub async fn list_available_plcs() -> Result<String, String> {
    Ok(pretty(&config::available_plcs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::testing::{DEVICE_IP, TOKEN, mock_bridge};

    #[tokio::test]
    async fn login_stores_the_session_token() {
        let server = mock_bridge().await;

        let message = login(
            &server,
            DEVICE_IP.to_string(),
            "admin".to_string(),
            "secret".to_string(),
        )
        .await
        .unwrap();

        assert!(message.contains("Login succeeded"));
        let entry = server.store.get(DEVICE_IP).await.unwrap();
        assert_eq!(entry.token, TOKEN);
        assert_eq!(entry.user, "admin");
    }

    #[tokio::test]
    async fn failed_login_leaves_the_store_empty() {
        let server = mock_bridge().await;

        let err = login(
            &server,
            DEVICE_IP.to_string(),
            "admin".to_string(),
            "wrong".to_string(),
        )
        .await
        .unwrap_err();

        assert!(err.contains("Login failed"));
        assert!(!server.store.contains(DEVICE_IP).await);
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_before_dispatch() {
        let server = mock_bridge().await;

        let err = login(&server, DEVICE_IP.to_string(), String::new(), "x".to_string())
            .await
            .unwrap_err();
        assert!(err.contains("username"));
    }

    #[tokio::test]
    async fn invalid_ip_is_rejected_before_dispatch() {
        let server = mock_bridge().await;

        let err = ping(&server, "300.1.2.3".to_string()).await.unwrap_err();
        assert!(err.contains("0-255"));

        let err = ping(&server, "not-an-ip".to_string()).await.unwrap_err();
        assert!(err.contains("invalid PLC IP address"));
    }

    #[tokio::test]
    async fn logout_removes_the_entry_and_is_idempotent() {
        let server = mock_bridge().await;
        login(
            &server,
            DEVICE_IP.to_string(),
            "admin".to_string(),
            "secret".to_string(),
        )
        .await
        .unwrap();

        assert!(logout(&server, DEVICE_IP.to_string()).await.is_ok());
        assert!(!server.store.contains(DEVICE_IP).await);

        // Second logout still succeeds; there is just nothing to remove
        assert!(logout(&server, DEVICE_IP.to_string()).await.is_ok());
        assert!(!server.store.contains(DEVICE_IP).await);
    }

    #[tokio::test]
    async fn ping_wraps_the_cpu_id() {
        let server = mock_bridge().await;

        let output = ping(&server, DEVICE_IP.to_string()).await.unwrap();
        assert!(output.contains("uID"));
        assert!(output.contains("cpu-uid-0001"));
    }

    #[tokio::test]
    async fn change_password_reports_acceptance() {
        let server = mock_bridge().await;

        let output = change_password(
            &server,
            DEVICE_IP.to_string(),
            "admin".to_string(),
            "secret".to_string(),
            "stronger".to_string(),
        )
        .await
        .unwrap();
        assert!(output.contains("NewPasswordAccepted"));
    }

    #[tokio::test]
    async fn close_ticket_requires_an_id() {
        let server = mock_bridge().await;

        let err = close_ticket(&server, DEVICE_IP.to_string(), String::new())
            .await
            .unwrap_err();
        assert!(err.contains("id"));
    }
}
