//! cloudgenie-mcp: MCP server for the CloudGenie internal developer platform
//!
//! This library provides a transport-agnostic Model Context Protocol server
//! and the CloudGenie tools, resources and prompts it serves.
//!
//! # Architecture
//!
//! The MCP core knows nothing about CloudGenie:
//!
//! - **Codec**: JSON-RPC 2.0 envelopes in and out
//! - **Registries**: tools (with handlers), resources and prompts
//! - **Dispatcher**: routes methods to the registries
//! - **Transports**: newline-delimited stdio, or HTTP POST on `/mcp`
//!
//! The CloudGenie layer registers its entities into the core at startup.
//!
//! # Modules
//!
//! - [`cloudgenie`]: CloudGenie API client and MCP entities
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`mcp`]: MCP protocol implementation

pub mod cloudgenie;
pub mod config;
pub mod error;
pub mod mcp;
