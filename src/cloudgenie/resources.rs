//! Static resources describing the CloudGenie catalogue.

use crate::mcp::registry::Registries;
use crate::mcp::types::Resource;

/// URI of the blueprint catalogue resource.
pub const BLUEPRINTS_URI: &str = "cloudgenie://blueprints";
/// URI of the provisioned-resources resource.
pub const RESOURCES_URI: &str = "cloudgenie://resources";

/// The resources advertised by `resources/list`.
#[must_use]
pub fn definitions() -> Vec<Resource> {
    vec![
        Resource {
            uri: BLUEPRINTS_URI.to_string(),
            name: "CloudGenie Blueprints".to_string(),
            description: "Catalogue of CloudGenie blueprints. Each blueprint is a reusable \
                          template (repository, database, service, ...) that resources are \
                          created from. Use the get_blueprints tool for live data."
                .to_string(),
            mime_type: "text/plain".to_string(),
        },
        Resource {
            uri: RESOURCES_URI.to_string(),
            name: "CloudGenie Resources".to_string(),
            description: "Resources provisioned through CloudGenie, each created from a \
                          blueprint and tracked with a status. Use the get_resources tool \
                          for live data."
                .to_string(),
            mime_type: "text/plain".to_string(),
        },
    ]
}

/// Registers the catalogue resources.
pub fn register(registries: &mut Registries) {
    for resource in definitions() {
        registries.register_resource(resource);
    }
}
