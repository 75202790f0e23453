//! MCP Common - Shared utilities for MCP servers
//!
//! This crate provides the plumbing every MCP server in the workspace needs:
//!
//! - **Initialization**: [`init_tracing`] for stderr logging
//! - **Registry**: [`ToolRegistry`] to register tools with explicit input and output schemas
//! - **Server**: [`McpApp`], the rmcp `ServerHandler` binding over a registry
//! - **Transports**: [`transport::serve_stdio`] and [`transport::serve_http`]
//! - **Shutdown**: signal handling and bounded draining of in-flight calls
//! - **Results/Errors**: helpers for building `CallToolResult` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{McpApp, ServerMetadata, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_tool("echo", "Echo the input", input_schema, output_schema, EchoHandler);
//!
//! let shutdown = tokio_util::sync::CancellationToken::new();
//! let app = McpApp::new(registry, ServerMetadata::new("echo-mcp", "0.1.0"), shutdown.clone());
//! mcp_common::transport::serve_stdio(app, shutdown).await?;
//! ```

pub mod error;
pub mod init;
pub mod registry;
pub mod result;
pub mod server;
pub mod shutdown;
pub mod transport;

// Re-export commonly used items at crate root
pub use error::{internal_error, invalid_params, ToolError, ToolResult};
pub use init::init_tracing;
pub use registry::{ToolHandler, ToolRegistry};
pub use result::{structured_success, tool_failure};
pub use server::{McpApp, ServerMetadata};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing ToolHandler
pub use async_trait::async_trait;

// Re-export the cancellation token handed to every tool call
pub use tokio_util::sync::CancellationToken;
