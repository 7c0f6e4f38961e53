use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::errors::ConfigError;
use super::forward::ForwardConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;

/// Main configuration structure for Burrow DNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listening socket (bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Forwarding engine (upstream, timeout, in-flight cap, drain grace)
    #[serde(default)]
    pub forward: ForwardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. burrow-dns.toml in current directory
    /// 3. /etc/burrow-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("burrow-dns.toml").exists() {
            Self::from_file("burrow-dns.toml")?
        } else if std::path::Path::new("/etc/burrow-dns/config.toml").exists() {
            Self::from_file("/etc/burrow-dns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(upstream) = overrides.upstream {
            self.forward.upstream = upstream;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration. All failures here are fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "Listen port cannot be 0".to_string(),
            ));
        }

        if self.forward.upstream.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream server configured (forward.upstream)".to_string(),
            ));
        }

        if self.upstream_addr().is_none() {
            return Err(ConfigError::Validation(format!(
                "Invalid upstream address '{}' (expected IP:PORT)",
                self.forward.upstream
            )));
        }

        if self.forward.max_in_flight == 0 {
            return Err(ConfigError::Validation(
                "forward.max_in_flight must be at least 1".to_string(),
            ));
        }

        if self.forward.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "forward.query_timeout_ms must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Upstream address as a socket address, if it parses.
    pub fn upstream_addr(&self) -> Option<SocketAddr> {
        self.forward.upstream.parse().ok()
    }

    /// Address the listener binds to, as `host:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream: Option<String>,
    pub log_level: Option<String>,
}
