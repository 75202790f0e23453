//! MCP server definition for macOS Shortcuts
//!
//! Registers the single `run_shortcut` tool and builds the [`McpApp`] the
//! transports serve.

use std::sync::Arc;

use mcp_common::{CancellationToken, McpApp, ServerMetadata, ToolRegistry};

use crate::handlers::RunShortcutHandler;
use crate::runner::ShortcutExecutor;
use crate::schema;

pub const SERVER_NAME: &str = "mac-shortcuts-mcp";
pub const RUN_SHORTCUT_TOOL_NAME: &str = "run_shortcut";

/// Version reported when the build carries none
pub const FALLBACK_VERSION: &str = "0.1.0";

pub const TITLE: &str = "macOS Shortcuts";
pub const WEBSITE_URL: &str = "https://support.apple.com/guide/shortcuts/welcome/mac";
pub const INSTRUCTIONS: &str = "Execute Siri Shortcuts on macOS hosts using the `shortcuts` \
    command line tool. Provide the shortcut display name and optional text input.";

const RUN_SHORTCUT_DESCRIPTION: &str = "Run a Siri Shortcut that exists on the host macOS \
    machine using the `shortcuts run` command.";

/// Package version, or [`FALLBACK_VERSION`]
pub fn server_version() -> &'static str {
    option_env!("CARGO_PKG_VERSION")
        .filter(|v| !v.is_empty())
        .unwrap_or(FALLBACK_VERSION)
}

/// Metadata advertised during initialize
pub fn metadata() -> ServerMetadata {
    ServerMetadata::new(SERVER_NAME, server_version())
        .with_title(TITLE)
        .with_instructions(INSTRUCTIONS)
        .with_website_url(WEBSITE_URL)
}

/// Registry exposing `run_shortcut` backed by `executor`
pub fn build_registry(executor: Arc<dyn ShortcutExecutor>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_tool(
        RUN_SHORTCUT_TOOL_NAME,
        RUN_SHORTCUT_DESCRIPTION,
        schema::input_schema(),
        schema::output_schema(),
        RunShortcutHandler::new(executor),
    );
    registry
}

/// Build the app served by every transport
pub fn build_app(executor: Arc<dyn ShortcutExecutor>, shutdown: CancellationToken) -> McpApp {
    McpApp::new(build_registry(executor), metadata(), shutdown)
}
