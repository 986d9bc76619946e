//! tallyctl configuration
//!
//! Loaded from the user config directory (~/.config/tally/config.toml).
//! Without an account token the CLI stays in Local mode: the wallet file is
//! the only state, and nothing is sent to the daemon.

use crate::client::TallydClient;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Daemon base URL
    #[serde(default = "default_server")]
    pub server: String,

    /// Bearer token naming this wallet's account. None = Local mode.
    #[serde(default)]
    pub account_token: Option<String>,

    /// Admin token for the admin subcommands
    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_server() -> String {
    "http://127.0.0.1:7810".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            account_token: None,
            admin_token: None,
        }
    }
}

impl ClientConfig {
    /// Default config file location
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally/config.toml")
    }

    /// Load from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load from a specific path (for testing)
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Account name shown in locally created wallet entries
    pub fn account_name(&self) -> String {
        self.account_token
            .clone()
            .unwrap_or_else(|| "local".to_string())
    }

    /// Client for account routes, if a token is configured
    pub fn client(&self) -> Option<TallydClient> {
        self.account_token
            .as_ref()
            .map(|token| TallydClient::new(&self.server, token))
    }

    /// Client for public routes (shop catalog, health); no token required
    pub fn public_client(&self) -> TallydClient {
        TallydClient::new(&self.server, self.account_token.as_deref().unwrap_or(""))
    }

    /// Client for admin routes, if the admin token is configured
    pub fn admin_client(&self) -> Option<TallydClient> {
        self.admin_token
            .as_ref()
            .map(|token| TallydClient::new(&self.server, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_means_local_mode() {
        let tmp = TempDir::new().unwrap();
        let config = ClientConfig::load_from(&tmp.path().join("missing.toml"));
        assert!(config.client().is_none());
        assert_eq!(config.account_name(), "local");
    }

    #[test]
    fn test_token_enables_sync() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "account_token = \"kid\"\n").unwrap();

        let config = ClientConfig::load_from(&path);
        assert!(config.client().is_some());
        assert_eq!(config.account_name(), "kid");
        assert_eq!(config.server, "http://127.0.0.1:7810");
    }
}
