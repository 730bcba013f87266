use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

/// Ticket file configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding every ticket.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Create the parent directory of `path` before each write
    /// (needed when the file lives on a freshly mounted volume).
    #[serde(default = "default_create_parent_dirs")]
    pub create_parent_dirs: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            create_parent_dirs: default_create_parent_dirs(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("tickets.json")
}

fn default_create_parent_dirs() -> bool {
    true
}
