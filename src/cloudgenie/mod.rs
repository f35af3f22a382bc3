//! CloudGenie integration: the tools, resources and prompts this server
//! exposes, backed by the CloudGenie REST API.
//!
//! - [`client`]: HTTP client for the backend
//! - [`models`]: API records and tool outputs
//! - [`tools`], [`resources`], [`prompts`]: MCP entities

pub mod client;
pub mod models;
pub mod prompts;
pub mod resources;
pub mod tools;

pub use client::CloudGenieClient;

use std::sync::Arc;

use crate::mcp::registry::Registries;

/// Builds registries holding every CloudGenie tool, resource and prompt.
#[must_use]
pub fn registries(client: &Arc<CloudGenieClient>) -> Registries {
    let mut registries = Registries::new();
    register_all(&mut registries, client);
    registries
}

/// Registers every CloudGenie tool, resource and prompt.
pub fn register_all(registries: &mut Registries, client: &Arc<CloudGenieClient>) {
    tools::register(registries, client);
    resources::register(registries);
    prompts::register(registries);

    let (tools, resources, prompts) = registries.counts();
    tracing::debug!(tools, resources, prompts, "Registered CloudGenie entities");
}
