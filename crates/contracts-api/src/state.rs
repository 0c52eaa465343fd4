//! # Application State
//!
//! Shared state for the Axum application and the sidecar's runtime
//! configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use contracts_schema::SchemaRegistry;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8079;

/// Default schema directory, relative to the working directory.
pub const DEFAULT_SCHEMA_DIR: &str = "contracts/schemas";

/// Runtime configuration for the sidecar binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Directory holding the `*.json` schema files.
    pub schema_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
        }
    }
}

impl AppConfig {
    /// Build configuration from `HOST`, `PORT` and `SCHEMA_DIR`.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("HOST")
            .and_then(|h| h.parse().ok())
            .unwrap_or(defaults.host);
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let schema_dir = lookup("SCHEMA_DIR")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.schema_dir);

        Self {
            host,
            port,
            schema_dir,
        }
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Shared application state passed to all route handlers.
///
/// Cloning is cheap: the registry sits behind an `Arc` and is never
/// mutated after load.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Schemas loaded at startup.
    pub registry: Arc<SchemaRegistry>,
}

impl AppState {
    /// Create application state around a loaded registry.
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
