//! Error types for cloudgenie-mcp.
//!
//! Protocol-level failures are not Rust errors here: the dispatcher turns
//! them into JSON-RPC error envelopes directly. The types below cover
//! configuration, the outbound CloudGenie client, and tool handlers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// An environment variable held an unusable value.
    #[error("invalid value for {variable}: {message}")]
    InvalidEnvironment {
        /// Name of the environment variable.
        variable: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised by the CloudGenie API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The configured base URL cannot carry path segments.
    #[error("invalid backend URL: {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },

    /// The request could not be completed (connection failure, timeout, ...).
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// The request body could not be serialised.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Failures inside a tool handler.
///
/// These are domain errors: the dispatcher reports them to the client as a
/// successful `tools/call` result with `isError: true`.
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required argument was not supplied.
    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    /// The arguments did not have the expected shape.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The CloudGenie backend call failed.
    #[error(transparent)]
    Backend(#[from] ClientError),

    /// The tool output could not be serialised.
    #[error("failed to serialise tool output: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        assert!(error.to_string().contains("invalid setting"));
    }

    #[test]
    fn status_error_carries_body() {
        let error = ClientError::Status {
            status: 404,
            body: "no such blueprint".to_string(),
        };
        assert_eq!(error.to_string(), "API error (status 404): no such blueprint");
    }

    #[test]
    fn backend_tool_error_is_transparent() {
        let error = ToolError::from(ClientError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(error.to_string(), "API error (status 500): boom");
    }

    #[test]
    fn missing_argument_display() {
        let error = ToolError::MissingArgument("name".to_string());
        assert_eq!(error.to_string(), "missing required argument 'name'");
    }
}
