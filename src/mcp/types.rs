//! MCP payload types: registered entities, method parameters and results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mcp::protocol::SERVER_NAME;

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server capabilities advertised during initialisation.
///
/// Registries never change while serving, so `listChanged` is always false
/// and therefore omitted from the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListCapability>,
    /// Resource-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceCapabilities>,
    /// Prompt-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<ListCapability>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ListCapability::default()),
            resources: Some(ResourceCapabilities::default()),
            prompts: Some(ListCapability::default()),
        }
    }
}

/// Capability flags shared by tools and prompts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCapability {
    /// Whether the list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Resource-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCapabilities {
    /// Whether clients may subscribe to resource updates.
    #[serde(skip_serializing_if = "is_false")]
    pub subscribe: bool,
    /// Whether the resource list can change during the session.
    #[serde(skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Server information for initialisation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Capabilities declared by the client. Only recorded, never enforced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientCapabilities {
    /// Filesystem roots support.
    #[serde(default)]
    pub roots: Option<Value>,
    /// Sampling support.
    #[serde(default)]
    pub sampling: Option<Value>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    pub capabilities: ClientCapabilities,
    /// Client information.
    pub client_info: ClientInfo,
}

/// Result of the initialize request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// The protocol version the server speaks.
    pub protocol_version: &'static str,
    /// Advertised feature groups.
    pub capabilities: ServerCapabilities,
    /// Server identity.
    pub server_info: ServerInfo,
}

/// Declared type of a single tool argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// JSON type name ("string", "object", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    pub description: String,
}

/// Declared parameter shape of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    /// Always "object" for tool arguments.
    #[serde(rename = "type")]
    pub kind: String,
    /// Per-argument declarations, in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Property>,
    /// Names of mandatory arguments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl InputSchema {
    /// An object schema with no properties.
    #[must_use]
    pub fn object() -> Self {
        Self {
            kind: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Adds an optional property.
    #[must_use]
    pub fn property(mut self, name: &str, kind: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            Property {
                kind: kind.to_string(),
                description: description.to_string(),
            },
        );
        self
    }

    /// Adds a property and marks it as required.
    #[must_use]
    pub fn required_property(mut self, name: &str, kind: &str, description: &str) -> Self {
        self.required.push(name.to_string());
        self.property(name, kind, description)
    }
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Declared argument shape.
    pub input_schema: InputSchema,
}

impl Tool {
    /// Creates a tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: InputSchema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A readable, URI-addressed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique resource URI.
    pub uri: String,
    /// Display name.
    pub name: String,
    /// Description; also served as the resource's content.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// MIME type of the content.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
}

/// A named prompt argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Whether the client must supply the argument.
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
}

/// A reusable prompt template descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// Unique prompt name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Arguments, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

/// Content item returned by tools and prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

impl Content {
    /// Creates a text content item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<Content>,
    /// Whether the tool call resulted in an error.
    pub is_error: bool,
}

impl ToolCallResult {
    /// Wraps handler output as a successful result.
    #[must_use]
    pub const fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(message)],
            is_error: true,
        }
    }
}

/// Parameters for resources/read request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    /// URI of the resource to read.
    pub uri: String,
}

/// One content entry of a resources/read result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// URI of the resource.
    pub uri: String,
    /// MIME type of `text`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    /// The resource body.
    pub text: String,
}

/// Result of a resources/read request.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    /// Always exactly one entry.
    pub contents: Vec<ResourceContents>,
}

/// Parameters for prompts/get request.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPromptParams {
    /// Name of the prompt.
    pub name: String,
    /// Template arguments (accepted, not interpolated).
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

/// Speaker of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user.
    User,
}

/// One message of a prompts/get result.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    /// Who speaks.
    pub role: Role,
    /// What is said.
    pub content: Content,
}

/// Result of a prompts/get request.
#[derive(Debug, Clone, Serialize)]
pub struct GetPromptResult {
    /// The prompt's description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Synthesised messages.
    pub messages: Vec<PromptMessage>,
}

/// Result of tools/list.
#[derive(Debug, Serialize)]
pub struct ListToolsResult<'a> {
    /// Registered tools, in registration order.
    pub tools: Vec<&'a Tool>,
}

/// Result of resources/list.
#[derive(Debug, Serialize)]
pub struct ListResourcesResult<'a> {
    /// Registered resources, in registration order.
    pub resources: Vec<&'a Resource>,
}

/// Result of prompts/list.
#[derive(Debug, Serialize)]
pub struct ListPromptsResult<'a> {
    /// Registered prompts, in registration order.
    pub prompts: Vec<&'a Prompt>,
}
