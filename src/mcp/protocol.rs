//! JSON-RPC 2.0 message codec for the MCP protocol.
//!
//! This module defines the envelopes exchanged with an MCP client and the
//! functions that move them to and from bytes.
//!
//! # Message Types
//!
//! - **Request**: A message expecting a response (has `id`)
//! - **Notification**: A one-way message (no `id`, no response expected)
//! - **Response**: A reply to a request, carrying exactly one of `result` or `error`
//!
//! # Decoding Rules
//!
//! Anything that is not a structurally valid envelope is rejected with a
//! `-32700` parse error whose `id` is `null`. Per-method parameter shapes are
//! not checked here; that is the dispatcher's job.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The JSON-RPC version every envelope must carry.
pub const JSONRPC_VERSION: &str = "2.0";

/// The MCP protocol version advertised during initialisation.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "idp-cloudgenie-mcp-server";

/// A JSON-RPC 2.0 request ID.
///
/// IDs are opaque: numbers (integral or not) and strings are echoed back
/// exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(serde_json::Number),
    /// String request ID.
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A JSON-RPC 2.0 request message.
///
/// Requests expect a response from the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// Request identifier, echoed in the response.
    pub id: RequestId,

    /// The method to invoke.
    pub method: String,

    /// Optional parameters for the method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 notification message.
///
/// Notifications do not have an ID and never receive a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcNotification {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The notification method.
    pub method: String,

    /// Optional parameters for the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,

    /// Additional information about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Creates a new error from an error code.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.default_message().to_string(),
            data: None,
        }
    }

    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Adds additional data to the error.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The payload of a response: a result or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The method succeeded.
    Result(Value),
    /// The method failed at the protocol level.
    Error(JsonRpcErrorData),
}

/// A JSON-RPC 2.0 response.
///
/// The `id` is always serialised; it is `null` when the request ID could not
/// be determined (parse errors).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to (if known).
    pub id: Option<RequestId>,

    /// Result or error.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Some(id),
            outcome: Outcome::Result(result),
        }
    }

    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn failure(id: Option<RequestId>, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(error),
        }
    }

    /// Creates a parse error response (ID cannot be determined).
    #[must_use]
    pub fn parse_error() -> Self {
        Self::failure(None, JsonRpcErrorData::from_code(ErrorCode::ParseError))
    }

    /// Creates a method not found error response.
    ///
    /// The message is the canonical "Method not found"; the offending method
    /// name travels in `data`.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::failure(
            Some(id),
            JsonRpcErrorData::from_code(ErrorCode::MethodNotFound)
                .with_data(serde_json::json!({ "method": method })),
        )
    }

    /// Returns the result payload, if this is a success response.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    /// Returns the error payload, if this is an error response.
    #[must_use]
    pub const fn error(&self) -> Option<&JsonRpcErrorData> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(error) => Some(error),
        }
    }
}

/// Any JSON-RPC envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// A request expecting a response.
    Request(JsonRpcRequest),
    /// A notification (no response expected).
    Notification(JsonRpcNotification),
    /// A response to an earlier request.
    Response(JsonRpcResponse),
}

impl Message {
    /// Returns the method name, if this message carries one.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Request(req) => Some(&req.method),
            Self::Notification(notif) => Some(&notif.method),
            Self::Response(_) => None,
        }
    }

    /// Returns the request ID, if this message carries one.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request(req) => Some(&req.id),
            Self::Notification(_) => None,
            Self::Response(resp) => resp.id.as_ref(),
        }
    }
}

/// Structural violations of the envelope shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// `jsonrpc` is missing or is not "2.0".
    #[error("jsonrpc field must be \"2.0\"")]
    UnsupportedVersion,
    /// `params` is present but is neither an object nor an array.
    #[error("params must be an object or an array")]
    UnstructuredParams,
    /// A response carries both `result` and `error`.
    #[error("response must not carry both result and error")]
    AmbiguousResponse,
    /// Neither a method nor a response payload was found.
    #[error("message has neither a method nor a result or error")]
    NotAMessage,
}

/// Wire shape used while decoding, before the envelope kind is known.
#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<RequestId>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorData>,
}

/// Keeps an explicit `null` result distinct from an absent one.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawMessage> for Message {
    type Error = EnvelopeError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        if raw.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            return Err(EnvelopeError::UnsupportedVersion);
        }

        if let Some(params) = &raw.params {
            if !params.is_object() && !params.is_array() {
                return Err(EnvelopeError::UnstructuredParams);
            }
        }

        match (raw.method, raw.result, raw.error) {
            (Some(method), None, None) => Ok(match raw.id {
                Some(id) => Self::Request(JsonRpcRequest {
                    jsonrpc: JSONRPC_VERSION,
                    id,
                    method,
                    params: raw.params,
                }),
                None => Self::Notification(JsonRpcNotification {
                    jsonrpc: JSONRPC_VERSION,
                    method,
                    params: raw.params,
                }),
            }),
            (None, Some(result), None) => Ok(Self::Response(JsonRpcResponse {
                jsonrpc: JSONRPC_VERSION,
                id: raw.id,
                outcome: Outcome::Result(result),
            })),
            (None, None, Some(error)) => Ok(Self::Response(JsonRpcResponse::failure(raw.id, error))),
            (None, Some(_), Some(_)) => Err(EnvelopeError::AmbiguousResponse),
            _ => Err(EnvelopeError::NotAMessage),
        }
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawMessage::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Decodes raw bytes into a message.
///
/// # Errors
///
/// Returns a ready-to-send `-32700` response if the bytes are not valid JSON
/// or do not form a JSON-RPC envelope.
pub fn decode(bytes: &[u8]) -> Result<Message, JsonRpcResponse> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed JSON-RPC message");
        JsonRpcResponse::parse_error()
    })
}

/// Parses a JSON string into a message.
///
/// # Errors
///
/// See [`decode`].
pub fn parse_message(json: &str) -> Result<Message, JsonRpcResponse> {
    decode(json.as_bytes())
}

/// Encodes a message as compact JSON (no embedded newlines).
///
/// # Errors
///
/// Returns an error if the payload cannot be serialised.
pub fn encode<T: Serialize>(message: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(message)
}
