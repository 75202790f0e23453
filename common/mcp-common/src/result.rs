//! Builders for `CallToolResult` values returned by tool handlers

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Create a successful response carrying both a summary and structured data
///
/// The summary goes into the text content block for humans, the serialized
/// `data` goes into `structuredContent` for clients that validate against the
/// tool's output schema.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::structured_success;
///
/// let result = structured_success("Shortcut 'Ping' completed successfully.", &payload)?;
/// ```
pub fn structured_success<T: Serialize>(
    summary: impl Into<String>,
    data: &T,
) -> Result<CallToolResult, McpError> {
    let structured = serde_json::to_value(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    let mut result = CallToolResult::success(vec![Content::text(summary.into())]);
    result.structured_content = Some(structured);
    Ok(result)
}

/// Create a tool-level error response (`isError: true`)
///
/// Used when the tool could not attempt the operation. The caller sees the
/// message as regular content rather than a JSON-RPC error.
pub fn tool_failure(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}
