//! Prompt templates for common CloudGenie workflows.

use crate::mcp::registry::Registries;
use crate::mcp::types::{Prompt, PromptArgument};

fn argument(name: &str, description: &str) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required: true,
    }
}

/// The prompts advertised by `prompts/list`.
#[must_use]
pub fn definitions() -> Vec<Prompt> {
    vec![
        Prompt {
            name: "blueprint_info".to_string(),
            description: "Get information about a CloudGenie blueprint".to_string(),
            arguments: vec![argument("blueprint_id", "ID of the blueprint")],
        },
        Prompt {
            name: "create_resource_from_blueprint".to_string(),
            description: "Create a CloudGenie resource from an existing blueprint".to_string(),
            arguments: vec![
                argument("blueprint_name", "Name of the blueprint to use"),
                argument("resource_name", "Name of the resource to create"),
            ],
        },
    ]
}

/// Registers the workflow prompts.
pub fn register(registries: &mut Registries) {
    for prompt in definitions() {
        registries.register_prompt(prompt);
    }
}
