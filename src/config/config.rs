//! Daemon configuration structures and loading.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level daemon configuration, read from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    /// Enable debug logging regardless of `RUST_LOG`.
    #[serde(default)]
    pub debug: bool,

    /// HTTP control surface.
    #[serde(default)]
    pub server: ServerConfiguration,

    /// Docker runtime connection.
    #[serde(default)]
    pub docker: DockerConfiguration,

    /// Defaults for netem sidecar containers.
    #[serde(default)]
    pub netem: NetemConfiguration,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            debug: false,
            server: ServerConfiguration::default(),
            docker: DockerConfiguration::default(),
            netem: NetemConfiguration::default(),
        }
    }
}

impl Configuration {
    /// Load configuration from a TOML file. A `PORT` environment variable,
    /// when set, overrides `server.port` (matching the upstream CLI's `PORT`
    /// env/flag convention).
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;

        let mut config: Configuration =
            toml::from_str(&content).with_context(|| "failed to parse configuration")?;

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("invalid PORT environment variable: {port}"))?;
        }

        Ok(config)
    }
}

/// HTTP control surface configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        ServerConfiguration {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

/// Docker runtime client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfiguration {
    /// Docker Engine socket/address. Empty string means "use the platform
    /// default" (`DOCKER_HOST`, or the local Unix socket / named pipe).
    #[serde(default)]
    pub socket: String,
}

impl Default for DockerConfiguration {
    fn default() -> Self {
        DockerConfiguration { socket: String::new() }
    }
}

/// Defaults applied to every netem command unless the request overrides them.
#[derive(Debug, Clone, Deserialize)]
pub struct NetemConfiguration {
    #[serde(default = "default_netem_image")]
    pub default_image: String,

    #[serde(default)]
    pub pull_by_default: bool,
}

impl Default for NetemConfiguration {
    fn default() -> Self {
        NetemConfiguration {
            default_image: default_netem_image(),
            pull_by_default: false,
        }
    }
}

fn default_netem_image() -> String {
    crate::chaos::client::docker::DEFAULT_NETEM_IMAGE.to_string()
}
