//! Configuration management for tallyd.
//!
//! Loads settings from /etc/tally/config.toml or uses defaults. Every field
//! has a serde default so a partial config file keeps working across
//! upgrades.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/tally/config.toml";

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address. Localhost only unless a reverse proxy fronts the API.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Ledger database location
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Token required for the admin routes. Empty disables them entirely.
    #[serde(default)]
    pub admin_token: String,

    /// Maximum transactions returned by the history endpoints
    #[serde(default = "default_transactions_limit")]
    pub transactions_limit: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1:7810".to_string()
}

fn default_db_path() -> String {
    tally_common::LEDGER_DB_PATH.to_string()
}

fn default_transactions_limit() -> usize {
    tally_common::TRANSACTION_HISTORY_LIMIT
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: default_db_path(),
            admin_token: String::new(),
            transactions_limit: default_transactions_limit(),
        }
    }
}

impl DaemonConfig {
    /// Load from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load from a specific path (for testing)
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Invalid config at {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Cannot read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// True when an admin token is configured at all
    pub fn admin_enabled(&self) -> bool {
        !self.admin_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let config = DaemonConfig::load_from(&tmp.path().join("missing.toml"));
        assert_eq!(config.listen_addr, "127.0.0.1:7810");
        assert_eq!(config.transactions_limit, 200);
        assert!(!config.admin_enabled());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "admin_token = \"sekrit\"\n").unwrap();

        let config = DaemonConfig::load_from(&path);
        assert_eq!(config.admin_token, "sekrit");
        assert!(config.admin_enabled());
        assert_eq!(config.listen_addr, "127.0.0.1:7810");
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "listen_addr = [not valid").unwrap();

        let config = DaemonConfig::load_from(&path);
        assert_eq!(config.listen_addr, "127.0.0.1:7810");
    }
}
