//! macOS Shortcuts MCP Library
//!
//! Exposes a single MCP tool, `run_shortcut`, that runs a named Shortcut via
//! `shortcuts run <name> [--input <text>]` with an optional timeout.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mac_shortcuts_mcp::{server, ShortcutRunner};
//!
//! let shutdown = mcp_common::CancellationToken::new();
//! let app = server::build_app(Arc::new(ShortcutRunner::new()), shutdown.clone());
//! mcp_common::transport::serve_stdio(app, shutdown).await?;
//! ```
//!
//! # Requirements
//! - macOS with the `shortcuts` command line tool on `PATH`

pub mod cli;
pub mod config;
pub mod handlers;
pub mod params;
pub mod runner;
pub mod schema;
pub mod server;
pub mod types;

// Re-export the pieces needed to embed the server
pub use params::{InvalidArgument, ShortcutRequest};
pub use runner::{RunnerError, ShortcutExecutor, ShortcutRunner};
pub use types::ExecutionResult;
