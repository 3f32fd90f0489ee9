//! Configuration for the hostdiff server.

use serde::Deserialize;

use crate::state::DEFAULT_MAX_UPLOAD_BYTES;

/// Server configuration.
///
/// Loaded from the `[server]` section of `hostdiff.toml` or
/// `HOSTDIFF__SERVER__` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on (default: "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Directory for stored snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Largest accepted snapshot upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
    "./data/snapshots".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            data_dir: default_data_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Load the server configuration from `{file_prefix}.toml` (optional) and the
/// environment. A missing `[server]` section yields the defaults.
pub fn load_server_config(file_prefix: &str) -> Result<ServerConfig, config::ConfigError> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("HOSTDIFF")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<ServerConfig>("server") {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => Ok(ServerConfig::default()),
        Err(e) => Err(e),
    }
}
