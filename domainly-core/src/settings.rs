//! Application settings
//!
//! Settings are a small TOML file; every field has a default so a missing or
//! partial file still yields a usable configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the nginx configuration file to parse and diff against
    #[serde(default = "default_nginx_conf_path")]
    pub nginx_conf_path: PathBuf,

    /// Hosts file location
    #[serde(default = "crate::hosts::hosts_path")]
    pub hosts_path: PathBuf,

    /// Fallback port for generated proxy targets
    #[serde(default = "default_proxy_port")]
    pub default_proxy_port: u16,

    /// Domain store location; platform data dir when unset
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_nginx_conf_path() -> PathBuf {
    PathBuf::from("/etc/nginx/nginx.conf")
}

fn default_proxy_port() -> u16 {
    3000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nginx_conf_path: default_nginx_conf_path(),
            hosts_path: crate::hosts::hosts_path(),
            default_proxy_port: default_proxy_port(),
            store_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse TOML settings
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_proxy_port, 3000);
        assert!(settings.store_path.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml("default_proxy_port = 4000\n").unwrap();
        assert_eq!(settings.default_proxy_port, 4000);
        assert_eq!(settings.nginx_conf_path, PathBuf::from("/etc/nginx/nginx.conf"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Settings::from_toml("default_proxy_port = ["),
            Err(Error::Config(_))
        ));
    }
}
