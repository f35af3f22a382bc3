//! Model Context Protocol (MCP) server implementation.
//!
//! This module implements a transport-agnostic MCP server speaking JSON-RPC
//! 2.0. Tools, resources and prompts are registered up front; the server then
//! answers discovery and invocation requests over stdio or HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         MCP Server                          │
//! │                                                             │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    │
//! │   │  Transport  │───▶│   Server    │───▶│ Registries  │    │
//! │   │(stdio/HTTP) │    │ (dispatch)  │    │ (handlers)  │    │
//! │   └─────────────┘    └─────────────┘    └─────────────┘    │
//! │          │                  │                  │            │
//! │          ▼                  ▼                  ▼            │
//! │   ┌─────────────────────────────────────────────────┐      │
//! │   │              JSON-RPC Messages                  │      │
//! │   └─────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod http;
pub mod method;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod transport;
pub mod types;

pub use protocol::{JsonRpcResponse, Message, RequestId, MCP_PROTOCOL_VERSION};
pub use registry::{Registries, ToolHandler};
pub use server::{McpServer, Session};
pub use transport::StdioTransport;
