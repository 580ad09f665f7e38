//! Configuration handling for VpnEndpointInspector

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const CONFIG_FILE: &str = "vpn-endpoint-inspector.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub export: ExportConfig,
    pub rras: RrasConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Status log file; the temp directory is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub default_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("VpnEndpointInspector_Export.csv"),
        }
    }
}

/// Where the RRAS role and router type live (HKEY_LOCAL_MACHINE relative)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RrasConfig {
    pub registry_key: String,
    pub parameters_key: String,
    pub router_value: String,
    pub service_name: String,
}

impl Default for RrasConfig {
    fn default() -> Self {
        Self {
            registry_key: r"SYSTEM\CurrentControlSet\Services\RemoteAccess".to_string(),
            parameters_key: r"SYSTEM\CurrentControlSet\Services\RemoteAccess\Parameters"
                .to_string(),
            router_value: "RouterType".to_string(),
            service_name: "RemoteAccess".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from an explicit path, the working directory, the user config
    /// directory, or fall back to defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("vpn-endpoint-inspector").join("config.toml");
            if user.exists() {
                return Self::load(&user);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }
}
