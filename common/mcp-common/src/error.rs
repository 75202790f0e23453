//! Error handling utilities for MCP servers
//!
//! Tool handlers distinguish two kinds of failure:
//!
//! - [`ToolError::Rejected`]: the operation could not be attempted (bad
//!   arguments, missing executable, spawn refused). Reported to the caller
//!   in-band as a `CallToolResult` with `isError: true`.
//! - [`ToolError::Protocol`]: a JSON-RPC level failure, reported as an MCP
//!   error response.

use rmcp::{model::CallToolResult, ErrorData as McpError};

use crate::result::tool_failure;

/// Error returned by a [`ToolHandler`](crate::ToolHandler)
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The tool refused or could not attempt the operation
    #[error("{0}")]
    Rejected(String),

    /// Protocol-level failure
    #[error("mcp error: {}", .0.message)]
    Protocol(McpError),
}

impl ToolError {
    /// Create a rejection with a message
    pub fn rejected(message: impl Into<String>) -> Self {
        ToolError::Rejected(message.into())
    }

    /// Convert into the shape rmcp returns from `call_tool`
    ///
    /// Rejections become an error result, protocol failures stay errors.
    pub fn into_call_result(self) -> Result<CallToolResult, McpError> {
        match self {
            ToolError::Rejected(message) => Ok(tool_failure(message)),
            ToolError::Protocol(err) => Err(err),
        }
    }
}

impl From<McpError> for ToolError {
    fn from(err: McpError) -> Self {
        ToolError::Protocol(err)
    }
}

/// Type alias for tool handler results
pub type ToolResult<T> = Result<T, ToolError>;

/// Create an internal error with a message
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::internal_error;
///
/// return Err(internal_error("request was cancelled").into());
/// ```
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Create an invalid params error with a message
///
/// Use this for requests the protocol layer itself cannot route,
/// such as an unknown tool name.
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}
