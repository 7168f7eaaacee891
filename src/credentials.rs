// src/credentials.rs
// In-memory session state, one entry per PLC endpoint

use std::collections::HashMap;
use tokio::sync::RwLock;

/// Authenticated session state for one endpoint. Created whole by a
/// successful login, replaced whole by the next login, removed by logout.
/// Never partially updated, never written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    pub user: String,
    pub password: String,
    pub token: String,
}

/// Process-wide mapping from PLC IP address to its session entry — the single
/// source of truth for "is this endpoint currently authenticated".
///
/// A present token is assumed valid; the store performs no expiry checking.
/// Staleness only surfaces when the device rejects the token, and the entry
/// stays in place until an explicit logout or a fresh login overwrites it.
#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: RwLock<HashMap<String, CredentialEntry>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional upsert for `ip`. Only one live session per endpoint is
    /// representable; concurrent logins race and the last write wins.
    pub async fn set(&self, ip: &str, entry: CredentialEntry) {
        self.entries.write().await.insert(ip.to_string(), entry);
    }

    pub async fn get(&self, ip: &str) -> Option<CredentialEntry> {
        self.entries.read().await.get(ip).cloned()
    }

    /// Remove the entry for `ip`. Idempotent; returns whether one was present.
    pub async fn remove(&self, ip: &str) -> bool {
        self.entries.write().await.remove(ip).is_some()
    }

    pub async fn contains(&self, ip: &str) -> bool {
        self.entries.read().await.contains_key(ip)
    }

    pub async fn ip_addresses(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str) -> CredentialEntry {
        CredentialEntry {
            user: "admin".to_string(),
            password: "secret".to_string(),
            token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn set_then_get_returns_the_entry() {
        let store = CredentialStore::new();
        store.set("192.168.0.1", entry("tok-1")).await;

        let stored = store.get("192.168.0.1").await.unwrap();
        assert_eq!(stored.token, "tok-1");
        assert!(store.contains("192.168.0.1").await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn set_overwrites_the_previous_session() {
        let store = CredentialStore::new();
        store.set("192.168.0.1", entry("old")).await;
        store.set("192.168.0.1", entry("new")).await;

        assert_eq!(store.get("192.168.0.1").await.unwrap().token, "new");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = CredentialStore::new();
        store.set("192.168.0.1", entry("tok")).await;

        assert!(store.remove("192.168.0.1").await);
        assert!(!store.remove("192.168.0.1").await);
        assert!(!store.contains("192.168.0.1").await);
    }

    #[tokio::test]
    async fn endpoints_are_independent() {
        let store = CredentialStore::new();
        store.set("192.168.0.1", entry("a")).await;
        store.set("192.168.0.2", entry("b")).await;
        store.remove("192.168.0.1").await;

        assert!(!store.contains("192.168.0.1").await);
        assert_eq!(store.get("192.168.0.2").await.unwrap().token, "b");

        let mut ips = store.ip_addresses().await;
        ips.sort();
        assert_eq!(ips, vec!["192.168.0.2"]);
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = CredentialStore::new();
        store.set("192.168.0.1", entry("a")).await;
        store.set("192.168.0.2", entry("b")).await;
        store.clear().await;
        assert!(store.is_empty().await);
    }
}
