//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default portal API base URL
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortalConfig {
    /// Portal API base URL
    pub api_url: Option<String>,
    /// Directory where generated QR images are written
    pub qr_output_dir: Option<String>,
}

impl PortalConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "gatepass", "gatepass-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: PortalConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Resolved API base URL: environment beats config beats default
    pub fn api_url(&self) -> String {
        std::env::var("GATEPASS_API_URL")
            .ok()
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Resolved QR output directory: config beats platform data dir
    pub fn qr_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.qr_output_dir {
            return PathBuf::from(dir);
        }
        ProjectDirs::from("io", "gatepass", "gatepass-tui")
            .map(|dirs| dirs.data_dir().join("qr"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert!(config.api_url.is_none());
        assert!(config.qr_output_dir.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = PortalConfig {
            api_url: Some("https://portal.example.com/api".to_string()),
            qr_output_dir: Some("/tmp/qr".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: PortalConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.api_url,
            Some("https://portal.example.com/api".to_string())
        );
        assert_eq!(parsed.qr_output_dir, Some("/tmp/qr".to_string()));
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let json = "{}";
        let parsed: PortalConfig = serde_json::from_str(json).unwrap();
        assert!(parsed.api_url.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"api_url": "http://x", "unknown_field": "value"}"#;
        let parsed: PortalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.api_url, Some("http://x".to_string()));
    }

    #[test]
    fn test_configured_api_url_wins_over_default() {
        let config = PortalConfig {
            api_url: Some("http://config".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "http://config");
    }

    #[test]
    fn test_default_api_url() {
        let config = PortalConfig::default();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_configured_qr_dir() {
        let config = PortalConfig {
            qr_output_dir: Some("/tmp/qr".to_string()),
            ..Default::default()
        };
        assert_eq!(config.qr_output_dir(), PathBuf::from("/tmp/qr"));
    }

    #[test]
    fn test_load_returns_default_when_no_file() {
        let result = PortalConfig::load();
        assert!(result.is_ok());
    }
}
