//! Registries of tools, resources and prompts.
//!
//! All three are keyed maps with last-write-wins registration and stable
//! (insertion) ordering. They are filled once during startup and only read
//! while requests are served, so they carry no locking.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::mcp::types::{Content, Prompt, Resource, Tool};

/// Arguments passed to a tool handler.
pub type Arguments = Map<String, Value>;

/// The behaviour bound to a registered tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool.
    ///
    /// # Errors
    ///
    /// Any error is reported to the client as a tool-level failure
    /// (`isError: true`), never as a protocol error.
    async fn call(&self, arguments: &Arguments) -> Result<Vec<Content>, ToolError>;
}

#[async_trait]
impl<F> ToolHandler for F
where
    F: Fn(&Arguments) -> Result<Vec<Content>, ToolError> + Send + Sync,
{
    async fn call(&self, arguments: &Arguments) -> Result<Vec<Content>, ToolError> {
        self(arguments)
    }
}

/// Pins a closure to the handler signature so its argument and return types
/// are inferred.
pub const fn handler_fn<F>(f: F) -> F
where
    F: Fn(&Arguments) -> Result<Vec<Content>, ToolError> + Send + Sync + 'static,
{
    f
}

/// A keyed store with last-write-wins semantics.
#[derive(Debug)]
pub struct Registry<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entry` under `key`, returning the entry it replaced.
    ///
    /// A replacement keeps the position of the original entry.
    pub fn register(&mut self, key: impl Into<String>, entry: T) -> Option<T> {
        self.entries.insert(key.into(), entry)
    }

    /// Looks up an entry by key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Iterates over all entries in registration order.
    pub fn list(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A tool definition together with its handler.
#[derive(Clone)]
pub struct RegisteredTool {
    /// What `tools/list` reports.
    pub definition: Tool,
    /// What `tools/call` runs.
    pub handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// The three registries owned by a server.
#[derive(Debug, Default)]
pub struct Registries {
    tools: Registry<RegisteredTool>,
    resources: Registry<Resource>,
    prompts: Registry<Prompt>,
}

impl Registries {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool and binds its handler.
    pub fn register_tool(&mut self, tool: Tool, handler: impl ToolHandler + 'static) {
        let name = tool.name.clone();
        let entry = RegisteredTool {
            definition: tool,
            handler: Arc::new(handler),
        };
        if self.tools.register(name.clone(), entry).is_some() {
            tracing::debug!(tool = %name, "Replaced previously registered tool");
        } else {
            tracing::debug!(tool = %name, "Registered tool");
        }
    }

    /// Registers a resource under its URI.
    pub fn register_resource(&mut self, resource: Resource) {
        let uri = resource.uri.clone();
        if self.resources.register(uri.clone(), resource).is_some() {
            tracing::debug!(uri = %uri, "Replaced previously registered resource");
        } else {
            tracing::debug!(uri = %uri, "Registered resource");
        }
    }

    /// Registers a prompt under its name.
    pub fn register_prompt(&mut self, prompt: Prompt) {
        let name = prompt.name.clone();
        if self.prompts.register(name.clone(), prompt).is_some() {
            tracing::debug!(prompt = %name, "Replaced previously registered prompt");
        } else {
            tracing::debug!(prompt = %name, "Registered prompt");
        }
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.lookup(name)
    }

    /// Looks up a resource by URI.
    #[must_use]
    pub fn resource(&self, uri: &str) -> Option<&Resource> {
        self.resources.lookup(uri)
    }

    /// Looks up a prompt by name.
    #[must_use]
    pub fn prompt(&self, name: &str) -> Option<&Prompt> {
        self.prompts.lookup(name)
    }

    /// All tool definitions, in registration order.
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.list().map(|entry| &entry.definition)
    }

    /// All resources, in registration order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.list()
    }

    /// All prompts, in registration order.
    pub fn prompts(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.list()
    }

    /// Entity counts as `(tools, resources, prompts)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.tools.len(), self.resources.len(), self.prompts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::types::InputSchema;

    fn resource(uri: &str, name: &str) -> Resource {
        Resource {
            uri: uri.to_string(),
            name: name.to_string(),
            description: String::new(),
            mime_type: "text/plain".to_string(),
        }
    }

    #[test]
    fn registry_keeps_insertion_order() {
        let mut registry = Registry::new();
        registry.register("b", 2);
        registry.register("a", 1);
        registry.register("c", 3);

        assert_eq!(registry.list().copied().collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn registry_last_write_wins() {
        let mut registry = Registry::new();
        assert_eq!(registry.register("k", "first"), None);
        assert_eq!(registry.register("k", "second"), Some("first"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("k"), Some(&"second"));
        assert_eq!(registry.lookup("missing"), None);
    }

    #[test]
    fn resources_replace_by_uri() {
        let mut registries = Registries::new();
        registries.register_resource(resource("test://a", "A"));
        registries.register_resource(resource("test://b", "B"));
        registries.register_resource(resource("test://a", "A2"));

        let names: Vec<_> = registries.resources().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A2", "B"]);
    }

    #[test]
    fn prompts_replace_by_name() {
        let prompt = |name: &str, description: &str| Prompt {
            name: name.to_string(),
            description: description.to_string(),
            arguments: Vec::new(),
        };

        let mut registries = Registries::new();
        registries.register_prompt(prompt("a", "first"));
        registries.register_prompt(prompt("b", "other"));
        registries.register_prompt(prompt("a", "second"));

        assert_eq!(registries.counts(), (0, 0, 2));
        let names: Vec<_> = registries.prompts().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registries.prompt("a").unwrap().description, "second");
    }

    #[tokio::test]
    async fn tool_replacement_rebinds_handler() {
        let mut registries = Registries::new();
        let tool = Tool::new("greet", "Greets", InputSchema::object());
        registries.register_tool(
            tool.clone(),
            handler_fn(|_| Ok(vec![Content::text("hello")])),
        );
        registries.register_tool(tool, handler_fn(|_| Ok(vec![Content::text("bonjour")])));

        assert_eq!(registries.counts(), (1, 0, 0));
        let entry = registries.tool("greet").unwrap();
        let output = entry.handler.call(&Arguments::new()).await.unwrap();
        assert_eq!(output, vec![Content::text("bonjour")]);
    }
}
