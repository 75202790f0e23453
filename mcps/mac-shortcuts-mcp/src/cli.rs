//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing, and the
//! merge of HTTP flags over the config file.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{ArgAction, Args, Parser, Subcommand};
use mcp_common::transport::{HttpOptions, TlsFiles};

use crate::config::HttpConfig;

#[derive(Parser, Debug)]
#[command(name = "mac-shortcuts-mcp")]
#[command(about = "Run the mac-shortcuts-mcp server over stdio or HTTP.")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search ./mac-shortcuts-mcp.toml, then the user config dir)
    #[arg(long, env = "SHORTCUTS_MCP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace). Default is info.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the package version
    Version,
    /// Start the MCP server using the stdio transport
    Stdio,
    /// Start the MCP server over HTTP(S) with streaming support
    Http(HttpArgs),
}

#[derive(Args, Debug, Default)]
pub struct HttpArgs {
    /// Host interface to bind [default: 127.0.0.1]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on [default: 8000]
    #[arg(long)]
    pub port: Option<u16>,

    /// Return JSON responses instead of SSE streams
    #[arg(long)]
    pub json_response: bool,

    /// Disable session reuse and treat every request independently
    #[arg(long)]
    pub stateless: bool,

    /// Allowed Host header (repeatable); enables DNS rebinding protection
    #[arg(long = "allowed-host", value_name = "HOST")]
    pub allowed_hosts: Vec<String>,

    /// Allowed Origin header (repeatable); enables DNS rebinding protection
    #[arg(long = "allowed-origin", value_name = "ORIGIN")]
    pub allowed_origins: Vec<String>,

    /// Path to a TLS certificate for HTTPS
    #[arg(long)]
    pub certfile: Option<PathBuf>,

    /// Path to the TLS private key matching --certfile
    #[arg(long)]
    pub keyfile: Option<PathBuf>,
}

impl HttpArgs {
    /// Merge flags over file settings into transport options
    ///
    /// Flags win. Repeated allow-list flags replace the file's list rather
    /// than extending it.
    pub fn into_options(self, file: &HttpConfig) -> anyhow::Result<HttpOptions> {
        let host = self.host.unwrap_or_else(|| file.host.clone());
        let port = self.port.unwrap_or(file.port);
        let addr = resolve_addr(&host, port)?;

        let allowed_hosts = if self.allowed_hosts.is_empty() {
            file.allowed_hosts.clone()
        } else {
            self.allowed_hosts
        };
        let allowed_origins = if self.allowed_origins.is_empty() {
            file.allowed_origins.clone()
        } else {
            self.allowed_origins
        };

        let tls = TlsFiles::from_pair(
            self.certfile.or_else(|| file.certfile.clone()),
            self.keyfile.or_else(|| file.keyfile.clone()),
        )?;

        Ok(HttpOptions {
            addr,
            json_response: self.json_response || file.json_response,
            stateless: self.stateless || file.stateless,
            allowed_hosts,
            allowed_origins,
            tls,
        })
    }
}

fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("invalid bind address {host}:{port}"))?
        .next()
        .ok_or_else(|| anyhow!("{host}:{port} did not resolve to an address"))
}
