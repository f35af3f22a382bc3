//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Environment variables are layered on top by [`Config::apply_env`].

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable overriding [`BackendConfig::url`].
pub const ENV_BACKEND_URL: &str = "CLOUDGENIE_BACKEND_URL";
/// Environment variable overriding [`HttpConfig::port`].
pub const ENV_HTTP_PORT: &str = "MCP_HTTP_PORT";
/// Environment variable overriding [`HttpConfig::bind_address`].
pub const ENV_HTTP_BIND_ADDRESS: &str = "MCP_HTTP_BIND_ADDRESS";

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// CloudGenie backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON over stdin/stdout.
    Stdio,
    /// HTTP POST to `/mcp` on the given address.
    Http(SocketAddr),
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid backend URL '{url}'. Must start with http:// or https://"),
            });
        }

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                message: "backend.timeout_secs must be greater than zero".to_string(),
            });
        }

        if self.http.port == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "http.port must be between 1 and 65535".to_string(),
            });
        }

        if self.http.bind_address.parse::<IpAddr>().is_err() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid bind address '{}'. Must be an IPv4 or IPv6 address",
                    self.http.bind_address
                ),
            });
        }

        Ok(())
    }

    /// Applies environment overrides, reading variables through `lookup`.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `MCP_HTTP_PORT` is not a port number.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = var(ENV_BACKEND_URL) {
            self.backend.url = url;
        }

        if let Some(port) = var(ENV_HTTP_PORT) {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvironment {
                    variable: ENV_HTTP_PORT,
                    message: format!("'{port}' is not a port number: {e}"),
                })?;
            self.http.port = Some(port);
        }

        if let Some(address) = var(ENV_HTTP_BIND_ADDRESS) {
            self.http.bind_address = address;
        }

        Ok(())
    }

    /// Selects the transport: HTTP when a port is configured, stdio otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address is not an IP address.
    pub fn transport(&self) -> Result<Transport, ConfigError> {
        let Some(port) = self.http.port else {
            return Ok(Transport::Stdio);
        };

        let ip: IpAddr =
            self.http
                .bind_address
                .parse()
                .map_err(|_| ConfigError::ValidationError {
                    message: format!("Invalid bind address '{}'", self.http.bind_address),
                })?;

        Ok(Transport::Http(SocketAddr::new(ip, port)))
    }
}

/// CloudGenie backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the CloudGenie API.
    /// Default: `http://localhost:50051/cloud-genie`
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:50051/cloud-genie".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Port to listen on. When unset the server uses stdio.
    #[serde(default)]
    pub port: Option<u16>,

    /// Address to bind the listener to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: None,
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
