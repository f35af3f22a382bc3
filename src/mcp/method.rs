//! The closed set of MCP methods understood by the server.
//!
//! Incoming `(method, params)` pairs are decoded here into typed variants, so
//! method implementations never see untyped parameter maps.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::mcp::types::{GetPromptParams, InitializeParams, ReadResourceParams, ToolCallParams};

/// A decoded MCP method call.
#[derive(Debug, Clone)]
pub enum Method {
    /// `initialize`
    Initialize(InitializeParams),
    /// `ping`
    Ping,
    /// `tools/list`
    ToolsList,
    /// `tools/call`
    ToolsCall(ToolCallParams),
    /// `resources/list`
    ResourcesList,
    /// `resources/read`
    ResourcesRead(ReadResourceParams),
    /// `prompts/list`
    PromptsList,
    /// `prompts/get`
    PromptsGet(GetPromptParams),
    /// Anything else.
    Unknown(String),
}

impl Method {
    /// Decodes a method name and its raw parameters.
    ///
    /// Methods that take no parameters ignore whatever was sent.
    ///
    /// # Errors
    ///
    /// Returns the decoder's message when the parameters do not fit the
    /// method's expected shape.
    pub fn parse(method: &str, params: Option<Value>) -> Result<Self, String> {
        Ok(match method {
            "initialize" => Self::Initialize(decode_params(params)?),
            "ping" => Self::Ping,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall(decode_params(params)?),
            "resources/list" => Self::ResourcesList,
            "resources/read" => Self::ResourcesRead(decode_params(params)?),
            "prompts/list" => Self::PromptsList,
            "prompts/get" => Self::PromptsGet(decode_params(params)?),
            other => Self::Unknown(other.to_string()),
        })
    }

    /// The wire name of this method.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Initialize(_) => "initialize",
            Self::Ping => "ping",
            Self::ToolsList => "tools/list",
            Self::ToolsCall(_) => "tools/call",
            Self::ResourcesList => "resources/list",
            Self::ResourcesRead(_) => "resources/read",
            Self::PromptsList => "prompts/list",
            Self::PromptsGet(_) => "prompts/get",
            Self::Unknown(name) => name,
        }
    }

    /// Whether the method may be used before the session is initialised.
    #[must_use]
    pub const fn allowed_before_init(&self) -> bool {
        matches!(self, Self::Initialize(_) | Self::Ping)
    }
}

/// Whether `method` is the client's acknowledgement of `initialize`.
///
/// It never gets a response, even when sent with an id.
#[must_use]
pub fn is_initialized(method: &str) -> bool {
    matches!(method, "initialized" | "notifications/initialized")
}

/// Missing params decode as an empty object, so required fields still fail.
/// Positional (array) params are rejected: every MCP method uses named ones.
fn decode_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    let value = params.unwrap_or_else(|| Value::Object(Map::new()));
    if !value.is_object() {
        return Err("params must be an object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_methods() {
        assert!(matches!(Method::parse("ping", None), Ok(Method::Ping)));
        assert!(matches!(Method::parse("tools/list", None), Ok(Method::ToolsList)));
    }

    #[test]
    fn recognises_initialized_acknowledgements() {
        assert!(is_initialized("initialized"));
        assert!(is_initialized("notifications/initialized"));
        assert!(!is_initialized("initialize"));
    }

    #[test]
    fn list_methods_ignore_params() {
        let params = Some(json!({"cursor": "abc"}));
        assert!(matches!(
            Method::parse("prompts/list", params),
            Ok(Method::PromptsList)
        ));
    }

    #[test]
    fn unknown_method_keeps_name() {
        let method = Method::parse("bogus/method", Some(json!([1]))).unwrap();
        assert_eq!(method.name(), "bogus/method");
    }

    #[test]
    fn tools_call_requires_name() {
        let err = Method::parse("tools/call", Some(json!({"arguments": {}}))).unwrap_err();
        assert!(err.contains("name"));
        assert!(Method::parse("tools/call", None).is_err());
    }

    #[test]
    fn tools_call_rejects_non_object_arguments() {
        let params = Some(json!({"name": "echo", "arguments": [1, 2]}));
        assert!(Method::parse("tools/call", params).is_err());
    }

    #[test]
    fn tools_call_accepts_missing_arguments() {
        let Ok(Method::ToolsCall(params)) =
            Method::parse("tools/call", Some(json!({"name": "echo"})))
        else {
            panic!("expected tools/call");
        };
        assert_eq!(params.name, "echo");
        assert!(params.arguments.is_none());
    }

    #[test]
    fn resources_read_rejects_array_params() {
        assert!(Method::parse("resources/read", Some(json!(["x"]))).is_err());
    }

    #[test]
    fn initialize_requires_protocol_version() {
        let params = Some(json!({"capabilities": {}, "clientInfo": {"name": "c"}}));
        assert!(Method::parse("initialize", params).is_err());
    }
}
