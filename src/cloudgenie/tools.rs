//! CloudGenie tools: blueprint discovery and resource lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::cloudgenie::client::CloudGenieClient;
use crate::cloudgenie::models::{
    BlueprintInfo, BlueprintList, CreateResourceInput, CreateResourceOutput, ResourceInfo,
    ResourceList,
};
use crate::error::ToolError;
use crate::mcp::registry::{Arguments, Registries, ToolHandler};
use crate::mcp::types::{Content, InputSchema, Tool};

/// A CloudGenie operation exposed as an MCP tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetBlueprints,
    GetBlueprintInfo,
    CreateResource,
    GetResources,
    GetResourceByName,
    UpdateResourceStatus,
    DeleteResource,
    HealthCheck,
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: [Self; 8] = [
        Self::GetBlueprints,
        Self::GetBlueprintInfo,
        Self::CreateResource,
        Self::GetResources,
        Self::GetResourceByName,
        Self::UpdateResourceStatus,
        Self::DeleteResource,
        Self::HealthCheck,
    ];

    /// The tool name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetBlueprints => "get_blueprints",
            Self::GetBlueprintInfo => "get_blueprint_info",
            Self::CreateResource => "create_resource",
            Self::GetResources => "get_resources",
            Self::GetResourceByName => "get_resource_by_name",
            Self::UpdateResourceStatus => "update_resource_status",
            Self::DeleteResource => "delete_resource",
            Self::HealthCheck => "health_check",
        }
    }

    /// The tool definition advertised by `tools/list`.
    #[must_use]
    pub fn definition(self) -> Tool {
        let (description, schema) = match self {
            Self::GetBlueprints => (
                "Get information about CloudGenie blueprints",
                InputSchema::object(),
            ),
            Self::GetBlueprintInfo => (
                "Get details of a single CloudGenie blueprint",
                InputSchema::object().required_property(
                    "blueprint_name",
                    "string",
                    "Blueprint name",
                ),
            ),
            Self::CreateResource => (
                "Create a new CloudGenie resource from a blueprint",
                InputSchema::object()
                    .required_property("name", "string", "Resource name")
                    .required_property("blueprintName", "string", "Blueprint name")
                    .property("description", "string", "Resource description")
                    .required_property("spec", "object", "Resource properties"),
            ),
            Self::GetResources => ("Get all CloudGenie resources", InputSchema::object()),
            Self::GetResourceByName => (
                "Get a CloudGenie resource by name",
                InputSchema::object().required_property("name", "string", "Resource name"),
            ),
            Self::UpdateResourceStatus => (
                "Update the status of a CloudGenie resource",
                InputSchema::object()
                    .required_property("name", "string", "Resource name")
                    .required_property("status", "string", "New resource status"),
            ),
            Self::DeleteResource => (
                "Delete a CloudGenie resource",
                InputSchema::object().required_property("name", "string", "Resource name"),
            ),
            Self::HealthCheck => (
                "Check the health of the CloudGenie backend",
                InputSchema::object(),
            ),
        };
        Tool::new(self.name(), description, schema)
    }
}

/// Handler binding an [`Operation`] to the backend client.
#[derive(Debug, Clone)]
pub struct CloudGenieTool {
    client: Arc<CloudGenieClient>,
    operation: Operation,
}

impl CloudGenieTool {
    /// Creates the handler for `operation`.
    #[must_use]
    pub const fn new(client: Arc<CloudGenieClient>, operation: Operation) -> Self {
        Self { client, operation }
    }
}

#[async_trait]
impl ToolHandler for CloudGenieTool {
    async fn call(&self, arguments: &Arguments) -> Result<Vec<Content>, ToolError> {
        let client = &self.client;
        let text = match self.operation {
            Operation::GetBlueprints => pretty(&BlueprintList {
                blueprints: client.blueprints().await?,
            })?,
            Operation::GetBlueprintInfo => {
                let name = required_str(arguments, "blueprint_name")?;
                pretty(&BlueprintInfo {
                    blueprint: client.blueprint(name).await?,
                })?
            }
            Operation::CreateResource => {
                let input = create_input(arguments)?;
                tracing::info!(name = %input.name, blueprint = %input.blueprint_name, "Creating resource");
                let resource = client.create_resource(&input).await?;
                pretty(&CreateResourceOutput::from(resource))?
            }
            Operation::GetResources => pretty(&ResourceList {
                resources: client.resources().await?,
            })?,
            Operation::GetResourceByName => {
                let name = required_str(arguments, "name")?;
                pretty(&ResourceInfo {
                    resource: client.resource(name).await?,
                })?
            }
            Operation::UpdateResourceStatus => {
                let name = required_str(arguments, "name")?;
                let status = required_str(arguments, "status")?;
                pretty(&ResourceInfo {
                    resource: client.update_resource_status(name, status).await?,
                })?
            }
            Operation::DeleteResource => {
                let name = required_str(arguments, "name")?;
                client.delete_resource(name).await?;
                format!("Resource '{name}' deleted")
            }
            Operation::HealthCheck => pretty(&client.health_check().await?)?,
        };

        Ok(vec![Content::text(text)])
    }
}

/// Registers one tool per [`Operation`].
pub fn register(registries: &mut Registries, client: &Arc<CloudGenieClient>) {
    for operation in Operation::ALL {
        registries.register_tool(
            operation.definition(),
            CloudGenieTool::new(Arc::clone(client), operation),
        );
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn required<'a>(arguments: &'a Arguments, key: &str) -> Result<&'a Value, ToolError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(key.to_string())),
        Some(value) => Ok(value),
    }
}

fn required_str<'a>(arguments: &'a Arguments, key: &str) -> Result<&'a str, ToolError> {
    let value = required(arguments, key)?
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments(format!("'{key}' must be a string")))?;
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArguments(format!("'{key}' must not be empty")));
    }
    Ok(value)
}

fn create_input(arguments: &Arguments) -> Result<CreateResourceInput, ToolError> {
    for key in ["name", "blueprintName", "spec"] {
        required(arguments, key)?;
    }
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
