use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{CfManageError, CfManageResult};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "CF_MANAGE_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Name of the Cloud Foundry app being managed
    pub app_name: String,
    /// Platform CLI binary
    pub cf_binary: String,
    /// Build step run before `cf push`, program first
    pub build_command: Vec<String>,
    /// Key under `mcpServers` in the printed client configuration
    pub service_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Service name reported by the health endpoint
    pub service_name: String,
    /// Where non-health requests are proxied to
    pub upstream: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app_name: "playwright-mcp-server".to_string(),
            cf_binary: "cf".to_string(),
            build_command: vec!["npm".to_string(), "run".to_string(), "build".to_string()],
            service_key: "playwright".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            service_name: "playwright-mcp-server".to_string(),
            upstream: None,
        }
    }
}

/// Get the config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }

    dirs::config_dir().map(|dir| dir.join("cf-manage"))
}

/// Read a TOML config file, falling back to defaults when it does not exist
fn load_or_default<T>(path: &Path) -> CfManageResult<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| CfManageError::ConfigLoadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

impl ClientConfig {
    pub fn load() -> CfManageResult<Self> {
        match get_config_dir() {
            Some(dir) => Self::load_from(&dir.join("client-config.toml")),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> CfManageResult<Self> {
        load_or_default(path)
    }
}

impl ServerConfig {
    pub fn load() -> CfManageResult<Self> {
        match get_config_dir() {
            Some(dir) => Self::load_from(&dir.join("server-config.toml")),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> CfManageResult<Self> {
        load_or_default(path)
    }
}
