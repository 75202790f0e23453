//! rmcp binding for a [`ToolRegistry`]
//!
//! [`McpApp`] is constructed once at process start and cloned into whichever
//! transport serves it. Clones share the registry, metadata, shutdown token and
//! in-flight task tracker.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::registry::ToolRegistry;

/// Process-wide metadata advertised during the initialize handshake
#[derive(Debug, Clone)]
pub struct ServerMetadata {
    pub name: String,
    pub version: String,
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub website_url: Option<String>,
}

impl ServerMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            title: None,
            instructions: None,
            website_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_website_url(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }
}

/// The MCP application served by the transports
#[derive(Clone)]
pub struct McpApp {
    registry: Arc<ToolRegistry>,
    metadata: Arc<ServerMetadata>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl McpApp {
    /// Create the application
    ///
    /// Cancelling `shutdown` cancels every in-flight tool call.
    pub fn new(
        registry: ToolRegistry,
        metadata: ServerMetadata,
        shutdown: CancellationToken,
    ) -> Self {
        if registry.is_empty() {
            tracing::warn!(server = %metadata.name, "no tools registered");
        }
        Self {
            registry: Arc::new(registry),
            metadata: Arc::new(metadata),
            shutdown,
            tracker: TaskTracker::new(),
        }
    }

    pub fn metadata(&self) -> &ServerMetadata {
        &self.metadata
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Tracker of in-flight tool calls, used to drain on shutdown
    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    /// Invoke a tool, propagating request cancellation into the handler
    ///
    /// The handler sees a token that fires on either server shutdown or
    /// `request_ct`. After cancellation the handler is still awaited so it can
    /// clean up whatever it started.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
        request_ct: CancellationToken,
    ) -> Result<CallToolResult, McpError> {
        let cancel = self.shutdown.child_token();
        let call = self
            .tracker
            .track_future(self.registry.call_tool(name, arguments, cancel.clone()));
        tokio::pin!(call);

        tokio::select! {
            result = &mut call => result,
            _ = request_ct.cancelled() => {
                tracing::debug!(tool = %name, "request cancelled by caller");
                cancel.cancel();
                call.await
            }
        }
    }
}

impl ServerHandler for McpApp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: self.metadata.instructions.clone(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.metadata.name.clone(),
                title: self.metadata.title.clone(),
                version: self.metadata.version.clone(),
                website_url: self.metadata.website_url.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.registry.list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = %request.name, "tool call");
        self.invoke(&request.name, request.arguments, context.ct).await
    }
}
