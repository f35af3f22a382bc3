//! CloudGenie API records and tool output shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A blueprint from the CloudGenie catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Blueprint name (unique).
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Blueprint version.
    #[serde(default)]
    pub version: String,
    /// Category, e.g. "repository" or "database".
    #[serde(default)]
    pub category: String,
    /// Parameter schema accepted by the blueprint.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// A resource provisioned from a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Backend-assigned identifier.
    #[serde(default)]
    pub id: String,
    /// Resource name (unique).
    pub name: String,
    /// Blueprint the resource was created from.
    #[serde(default)]
    pub blueprint_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provisioning status as reported by the backend.
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Properties the resource was created with.
    #[serde(default)]
    pub spec: Map<String, Value>,
}

/// Body of `POST /v1/resources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceInput {
    pub name: String,
    pub blueprint_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub spec: Map<String, Value>,
}

/// Output of the `create_resource` tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateResourceOutput {
    pub name: String,
    pub status: Value,
}

impl From<Resource> for CreateResourceOutput {
    fn from(resource: Resource) -> Self {
        Self {
            name: resource.name,
            status: resource.status,
        }
    }
}

/// Body of `PATCH /v1/resources/{name}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusRequest<'a> {
    pub status: &'a str,
}

/// Response of `GET /v1/healthcheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Output of the `get_blueprints` tool.
#[derive(Debug, Serialize)]
pub struct BlueprintList {
    pub blueprints: Vec<Blueprint>,
}

/// Output of the `get_blueprint_info` tool.
#[derive(Debug, Serialize)]
pub struct BlueprintInfo {
    pub blueprint: Blueprint,
}

/// Output of the `get_resources` tool.
#[derive(Debug, Serialize)]
pub struct ResourceList {
    pub resources: Vec<Resource>,
}

/// Output of the `get_resource_by_name` and `update_resource_status` tools.
#[derive(Debug, Serialize)]
pub struct ResourceInfo {
    pub resource: Resource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_tolerates_sparse_backend_records() {
        let resource: Resource = serde_json::from_value(json!({"name": "repo-1"})).unwrap();
        assert_eq!(resource.name, "repo-1");
        assert_eq!(resource.status, Value::Null);
        assert!(resource.spec.is_empty());
    }

    #[test]
    fn create_input_uses_camel_case() {
        let input = CreateResourceInput {
            name: "repo-1".to_string(),
            blueprint_name: "xGitRepo".to_string(),
            description: None,
            spec: Map::new(),
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"name": "repo-1", "blueprintName": "xGitRepo", "spec": {}})
        );
    }

    #[test]
    fn resource_status_may_be_structured() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "r-1",
            "name": "db",
            "blueprint_name": "postgres",
            "status": {"phase": "Ready"},
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
            "spec": {"size": "small"}
        }))
        .unwrap();

        let output = CreateResourceOutput::from(resource);
        assert_eq!(output.status["phase"], "Ready");
    }
}
