//! Tool registry
//!
//! The single interface servers use to expose tools:
//! [`ToolRegistry::register_tool`] takes a name, a description, the input and
//! output JSON schemas, and a [`ToolHandler`]. The rmcp binding in
//! [`crate::server`] only ever talks to the registry, so handlers never see
//! protocol-library types beyond `CallToolResult`.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{
//!     async_trait, CallToolResult, CancellationToken, Content, JsonObject, ToolHandler, ToolResult,
//! };
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ToolHandler for Echo {
//!     async fn call(&self, arguments: JsonObject, _cancel: CancellationToken) -> ToolResult<CallToolResult> {
//!         let echoed = serde_json::Value::Object(arguments).to_string();
//!         Ok(CallToolResult::success(vec![Content::text(echoed)]))
//!     }
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_tool("echo", "Echo arguments back", input, output, Echo);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    model::{CallToolResult, JsonObject, Tool},
    ErrorData as McpError,
};
use tokio_util::sync::CancellationToken;

use crate::error::{invalid_params, ToolResult};

/// A callable tool
///
/// Implementations must be `Send + Sync` to support concurrent tool calls
/// from multiple async tasks.
#[async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    /// Execute the tool with raw caller-supplied arguments
    ///
    /// `cancel` fires when the caller cancels the request or the server shuts
    /// down. Handlers that start external work must stop it when it fires.
    async fn call(
        &self,
        arguments: JsonObject,
        cancel: CancellationToken,
    ) -> ToolResult<CallToolResult>;
}

struct RegisteredTool {
    definition: Tool,
    handler: Arc<dyn ToolHandler>,
}

/// Registry of the tools a server exposes
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Registering the same name twice replaces the earlier tool.
    pub fn register_tool(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: impl Into<Arc<JsonObject>>,
        output_schema: impl Into<Arc<JsonObject>>,
        handler: impl ToolHandler,
    ) -> &mut Self {
        let name = name.into();
        let mut definition = Tool::new(name.clone(), description.into(), input_schema);
        definition.output_schema = Some(output_schema.into());

        if self
            .tools
            .insert(
                name.clone(),
                RegisteredTool {
                    definition,
                    handler: Arc::new(handler),
                },
            )
            .is_some()
        {
            tracing::warn!(tool = %name, "replacing previously registered tool");
        }
        self
    }

    /// Returns the definitions of all registered tools, ordered by name
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Executes a tool by name
    ///
    /// Unknown names are protocol errors. Handler rejections are converted
    /// into error results so the caller sees them as tool output.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        cancel: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let Some(tool) = self.tools.get(name) else {
            return Err(invalid_params(format!("tool not found: {}", name)));
        };

        let handler = Arc::clone(&tool.handler);
        match handler.call(arguments.unwrap_or_default(), cancel).await {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::debug!(tool = %name, error = %err, "tool call failed");
                err.into_call_result()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use rmcp::model::Content;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(
            &self,
            arguments: JsonObject,
            _cancel: CancellationToken,
        ) -> ToolResult<CallToolResult> {
            let echoed = serde_json::Value::Object(arguments).to_string();
            Ok(CallToolResult::success(vec![Content::text(echoed)]))
        }
    }

    struct Refuse;

    #[async_trait]
    impl ToolHandler for Refuse {
        async fn call(
            &self,
            _arguments: JsonObject,
            _cancel: CancellationToken,
        ) -> ToolResult<CallToolResult> {
            Err(ToolError::rejected("refused"))
        }
    }

    fn object(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register_tool(
                "echo",
                "Echo arguments",
                object(json!({"type": "object"})),
                object(json!({"type": "object", "properties": {"ok": {"type": "boolean"}}})),
                Echo,
            )
            .register_tool(
                "refuse",
                "Always refuses",
                object(json!({"type": "object"})),
                object(json!({"type": "object"})),
                Refuse,
            );
        registry
    }

    #[test]
    fn test_len_counts_distinct_names() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register_tool("echo", "Echo", JsonObject::new(), JsonObject::new(), Echo);
        registry.register_tool("echo", "Echo again", JsonObject::new(), JsonObject::new(), Echo);
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert_eq!(registry.list_tools()[0].description.as_deref(), Some("Echo again"));
    }

    #[test]
    fn test_list_tools_carries_schemas() {
        let registry = registry();
        let tools = registry.list_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "echo");
        let output = tools[0].output_schema.as_ref().unwrap();
        assert!(output.contains_key("properties"));
    }

    #[tokio::test]
    async fn test_call_known_tool() {
        let registry = registry();
        let result = registry
            .call_tool("echo", Some(object(json!({"a": 1}))), CancellationToken::new())
            .await
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn test_missing_arguments_default_to_empty_object() {
        let registry = registry();
        let result = registry
            .call_tool("echo", None, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_is_error_result() {
        let registry = registry();
        let result = registry
            .call_tool("refuse", None, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = registry();
        let err = registry
            .call_tool("unknown", None, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("tool not found"));
    }
}
