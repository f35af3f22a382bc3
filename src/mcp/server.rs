//! MCP server: method dispatch over the registries.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version advertisement
//! 2. **Operation**: Listing and reading registered entities, calling tools
//! 3. **Shutdown**: End of input or a termination signal (transport-level)
//!
//! The same [`McpServer`] backs both transports. Per-connection state lives
//! in a [`Session`]: one for the whole stdio stream, a fresh one for every
//! HTTP POST.

use std::future::Future;
use std::io;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::mcp::method::{is_initialized, Method};
use crate::mcp::protocol::{
    decode, ErrorCode, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse, Message,
    MCP_PROTOCOL_VERSION,
};
use crate::mcp::registry::{Arguments, Registries};
use crate::mcp::transport::{shutdown_signal, StdioTransport};
use crate::mcp::types::{
    Content, GetPromptParams, GetPromptResult, InitializeParams, InitializeResult,
    ListPromptsResult, ListResourcesResult, ListToolsResult, PromptMessage, ReadResourceParams,
    ReadResourceResult, ResourceContents, Role, ServerCapabilities, ServerInfo, ToolCallParams,
    ToolCallResult,
};

/// Session state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize answered; normal operation.
    Ready,
}

/// Per-connection protocol state.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    client_name: Option<String>,
    requested_version: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session awaiting initialisation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::AwaitingInit,
            client_name: None,
            requested_version: None,
        }
    }

    /// Returns the current session state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Name the client gave in `initialize`, if any.
    #[must_use]
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    /// Protocol version the client asked for in `initialize`, if any.
    #[must_use]
    pub fn requested_version(&self) -> Option<&str> {
        self.requested_version.as_deref()
    }
}

/// The MCP server.
#[derive(Debug)]
pub struct McpServer {
    info: ServerInfo,
    capabilities: ServerCapabilities,
    registries: Registries,
}

impl McpServer {
    /// Creates a server over fully populated registries.
    #[must_use]
    pub fn new(registries: Registries) -> Self {
        Self {
            info: ServerInfo::default(),
            capabilities: ServerCapabilities::default(),
            registries,
        }
    }

    /// Overrides the name and version reported by `initialize`.
    #[must_use]
    pub fn with_server_info(mut self, info: ServerInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the server's registries.
    #[must_use]
    pub const fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Serves stdin/stdout until end of input or a termination signal.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&self) -> io::Result<()> {
        let (tools, resources, prompts) = self.registries.counts();
        tracing::info!(tools, resources, prompts, "Serving MCP over stdio");

        let mut transport = StdioTransport::new();
        self.serve(&mut transport, shutdown_signal()).await
    }

    /// Runs the read-dispatch-write loop over `transport`.
    ///
    /// Requests are handled strictly one at a time, so responses leave in the
    /// order their requests arrived.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails. Malformed input is not
    /// an error.
    pub async fn serve<R, W, S>(
        &self,
        transport: &mut StdioTransport<R, W>,
        shutdown: S,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut session = Session::new();

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Shutdown requested, leaving stdio loop");
                    return Ok(());
                }

                frame = transport.read_frame() => {
                    let Some(frame) = frame? else {
                        tracing::info!("End of input, leaving stdio loop");
                        return Ok(());
                    };

                    if frame.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }

                    if let Some(response) = self.handle_bytes(&mut session, &frame).await {
                        transport.write_response(&response).await?;
                    }
                }
            }
        }
    }

    /// Decodes and handles one raw message.
    ///
    /// Returns the response to send back, if any. Undecodable input yields a
    /// parse error response.
    pub async fn handle_bytes(&self, session: &mut Session, bytes: &[u8]) -> Option<JsonRpcResponse> {
        match decode(bytes) {
            Ok(message) => self.handle_message(session, message).await,
            Err(parse_error) => Some(parse_error),
        }
    }

    /// Handles a decoded message.
    ///
    /// Notifications, client-sent responses and `initialized` (with or
    /// without an id) produce no reply.
    pub async fn handle_message(
        &self,
        session: &mut Session,
        message: Message,
    ) -> Option<JsonRpcResponse> {
        if message.method().is_some_and(is_initialized) {
            session.state = SessionState::Ready;
            tracing::info!(id = ?message.id(), "Client initialised");
            return None;
        }

        match message {
            Message::Request(req) => Some(self.handle_request(session, req).await),
            Message::Notification(notif) => {
                tracing::debug!(method = %notif.method, "Ignoring notification");
                None
            }
            Message::Response(resp) => {
                tracing::warn!(id = ?resp.id, "Ignoring response sent by client");
                None
            }
        }
    }

    /// Handles an incoming request.
    async fn handle_request(&self, session: &mut Session, req: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest {
            id, method, params, ..
        } = req;

        let method = match Method::parse(&method, params) {
            Ok(method) => method,
            Err(detail) => {
                tracing::info!(method = %method, id = %id, error = %detail, "Rejected invalid params");
                return JsonRpcResponse::failure(
                    Some(id),
                    JsonRpcErrorData::from_code(ErrorCode::InvalidParams).with_data(json!(detail)),
                );
            }
        };

        if session.state == SessionState::AwaitingInit && !method.allowed_before_init() {
            tracing::warn!(method = %method.name(), "Request received before initialize");
        }

        let name = method.name().to_string();
        let outcome = match method {
            Method::Initialize(params) => self.handle_initialize(session, params),
            Method::Ping => Ok(Self::handle_ping()),
            Method::ToolsList => self.handle_tools_list(),
            Method::ToolsCall(params) => self.handle_tools_call(params).await,
            Method::ResourcesList => self.handle_resources_list(),
            Method::ResourcesRead(params) => self.handle_resources_read(&params),
            Method::PromptsList => self.handle_prompts_list(),
            Method::PromptsGet(params) => self.handle_prompts_get(&params),
            Method::Unknown(name) => {
                tracing::info!(method = %name, id = %id, "Method not found");
                return JsonRpcResponse::method_not_found(id, &name);
            }
        };

        match outcome {
            Ok(result) => {
                tracing::info!(method = %name, id = %id, outcome = "success", "Handled request");
                JsonRpcResponse::success(id, result)
            }
            Err(error) => {
                tracing::info!(
                    method = %name,
                    id = %id,
                    code = error.code,
                    outcome = "failure",
                    "Handled request"
                );
                JsonRpcResponse::failure(Some(id), error)
            }
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(
        &self,
        session: &mut Session,
        params: InitializeParams,
    ) -> Result<Value, JsonRpcErrorData> {
        tracing::info!(
            client = %params.client_info.name,
            client_version = params.client_info.version.as_deref().unwrap_or("unknown"),
            requested_version = %params.protocol_version,
            "Initialising session"
        );

        if session.state == SessionState::Ready {
            tracing::debug!("Session re-initialised");
        }

        session.client_name = Some(params.client_info.name);
        session.requested_version = Some(params.protocol_version);
        session.state = SessionState::Ready;

        to_result(&InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION,
            capabilities: self.capabilities.clone(),
            server_info: self.info.clone(),
        })
    }

    /// Handles the ping request.
    fn handle_ping() -> Value {
        json!({})
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self) -> Result<Value, JsonRpcErrorData> {
        to_result(&ListToolsResult {
            tools: self.registries.tools().collect(),
        })
    }

    /// Handles the tools/call request.
    ///
    /// Handler failures become `isError` results, not protocol errors.
    async fn handle_tools_call(&self, params: ToolCallParams) -> Result<Value, JsonRpcErrorData> {
        let Some(entry) = self.registries.tool(&params.name) else {
            return Err(JsonRpcErrorData::with_message(
                ErrorCode::InvalidParams,
                format!("Tool not found: {}", params.name),
            ));
        };

        let arguments: Arguments = params.arguments.unwrap_or_default();
        tracing::debug!(tool = %params.name, ?arguments, "Calling tool");

        let result = match entry.handler.call(&arguments).await {
            Ok(content) => ToolCallResult::success(content),
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool execution failed");
                ToolCallResult::error(format!("Error: {e}"))
            }
        };

        to_result(&result)
    }

    /// Handles the resources/list request.
    fn handle_resources_list(&self) -> Result<Value, JsonRpcErrorData> {
        to_result(&ListResourcesResult {
            resources: self.registries.resources().collect(),
        })
    }

    /// Handles the resources/read request.
    fn handle_resources_read(&self, params: &ReadResourceParams) -> Result<Value, JsonRpcErrorData> {
        let resource = self.registries.resource(&params.uri).ok_or_else(|| {
            JsonRpcErrorData::with_message(
                ErrorCode::InvalidParams,
                format!("Resource not found: {}", params.uri),
            )
        })?;

        to_result(&ReadResourceResult {
            contents: vec![ResourceContents {
                uri: resource.uri.clone(),
                mime_type: resource.mime_type.clone(),
                text: resource.description.clone(),
            }],
        })
    }

    /// Handles the prompts/list request.
    fn handle_prompts_list(&self) -> Result<Value, JsonRpcErrorData> {
        to_result(&ListPromptsResult {
            prompts: self.registries.prompts().collect(),
        })
    }

    /// Handles the prompts/get request.
    fn handle_prompts_get(&self, params: &GetPromptParams) -> Result<Value, JsonRpcErrorData> {
        let prompt = self.registries.prompt(&params.name).ok_or_else(|| {
            JsonRpcErrorData::with_message(
                ErrorCode::InvalidParams,
                format!("Prompt not found: {}", params.name),
            )
        })?;

        to_result(&GetPromptResult {
            description: prompt.description.clone(),
            messages: vec![PromptMessage {
                role: Role::User,
                content: Content::text(format!("Prompt: {}", prompt.name)),
            }],
        })
    }
}

/// Serialises a method result, mapping failure to an internal error.
fn to_result<T: Serialize>(result: &T) -> Result<Value, JsonRpcErrorData> {
    serde_json::to_value(result).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialise method result");
        JsonRpcErrorData::with_message(
            ErrorCode::InternalError,
            "Internal error: failed to serialise result",
        )
    })
}
