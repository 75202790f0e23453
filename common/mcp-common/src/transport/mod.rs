//! Transports serving an [`McpApp`](crate::McpApp)
//!
//! - [`serve_stdio`]: line-delimited JSON-RPC over stdin/stdout
//! - [`serve_http`]: Streamable HTTP at `/mcp`, optionally TLS, with
//!   rebinding protection and a buffered JSON response mode

pub mod http;
pub mod json_response;
pub mod rebinding;
pub mod stdio;

pub use http::{serve_http, HttpOptions, TlsFiles, TransportError};
pub use stdio::serve_stdio;
