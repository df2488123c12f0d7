//! Session persistence for the signed-in customer
//!
//! The session survives restarts on disk using the storage keys the web
//! portal used (`accessToken`, `refreshToken`, `user`), so a session file
//! written by an older build keeps working.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// The signed-in customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Identity plus token pair, tied to login/logout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken", alias = "customerToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub user: User,
}

impl Session {
    /// The bearer token for API calls, if one is present
    pub fn bearer_token(&self) -> Option<&str> {
        if self.access_token.is_empty() {
            None
        } else {
            Some(&self.access_token)
        }
    }
}

/// Loads and saves the session file under the platform data directory
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    /// Override for tests; `None` means the platform location
    path_override: Option<PathBuf>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn at(path: PathBuf) -> Self {
        Self {
            path_override: Some(path),
        }
    }

    fn session_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path_override {
            return Some(path.clone());
        }
        ProjectDirs::from("io", "gatepass", "gatepass-tui")
            .map(|dirs| dirs.data_dir().join("session.json"))
    }

    /// Load the persisted session, if any. A corrupt file is treated as
    /// signed-out rather than an error.
    pub fn load(&self) -> Option<Session> {
        let path = self.session_path()?;
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!("Discarding unreadable session file: {err}");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Persist the session to disk
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(path) = self.session_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(session)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Remove the persisted session (logout)
    pub fn clear(&self) -> Result<()> {
        if let Some(path) = self.session_path() {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_session() -> Session {
        Session {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-xyz".to_string(),
            user: User {
                email: "ops@gatepass.io".to_string(),
                username: "gatekeeper".to_string(),
                phone: Some("+919876543210".to_string()),
                company_name: Some("Gatepass Logistics".to_string()),
            },
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        store.save(&sample_session()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, sample_session());
    }

    #[test]
    fn test_serialized_keys_match_legacy_storage() {
        let json = serde_json::to_string(&sample_session()).unwrap();
        assert!(json.contains("\"accessToken\""));
        assert!(json.contains("\"refreshToken\""));
        assert!(json.contains("\"user\""));
        assert!(!json.contains("access_token"));
    }

    #[test]
    fn test_legacy_customer_token_key_accepted() {
        let json = r#"{
            "customerToken": "legacy-token",
            "refreshToken": "refresh",
            "user": { "email": "a@b.co", "username": "a" }
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "legacy-token");
    }

    #[test]
    fn test_load_missing_file_is_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::at(path.clone());
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::at(path.clone());

        store.save(&sample_session()).unwrap();
        assert!(path.exists());
        store.clear().unwrap();
        assert!(!path.exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_bearer_token_empty_is_none() {
        let mut session = sample_session();
        assert_eq!(session.bearer_token(), Some("access-abc"));
        session.access_token.clear();
        assert_eq!(session.bearer_token(), None);
    }
}
