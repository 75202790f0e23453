//! macOS Shortcuts MCP - Run Siri Shortcuts through the `shortcuts` CLI
//!
//! Serves the `run_shortcut` tool over stdio or streamable HTTP(S).

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mcp_common::{shutdown, transport, CancellationToken};

use mac_shortcuts_mcp::cli::{Cli, Commands};
use mac_shortcuts_mcp::config::Config;
use mac_shortcuts_mcp::server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("{}", server::server_version());
        return Ok(());
    }

    mcp_common::init_tracing(&["mac_shortcuts_mcp", "mcp_common"], cli.verbose)?;
    let config = Config::load(cli.config.as_deref())?;

    let runner = config.runner.runner();
    match runner.resolve() {
        Some(path) => tracing::debug!("Using shortcuts executable {}", path.display()),
        None => tracing::warn!(
            "'{}' was not found on PATH; run_shortcut calls will fail until it is installed",
            runner.program()
        ),
    }

    let root = CancellationToken::new();
    let signals = shutdown::spawn_signal_listener(root.clone());
    let app = server::build_app(Arc::new(runner), root.clone());
    let tracker = app.tracker().clone();

    let served = match cli.command {
        Commands::Http(args) => match args.into_options(&config.http) {
            Ok(options) => transport::serve_http(app, options, root.clone()).await,
            Err(e) => Err(e),
        },
        Commands::Stdio => transport::serve_stdio(app, root.clone()).await,
        Commands::Version => Ok(()),
    };

    let signalled = root.is_cancelled();
    root.cancel();
    signals.abort();

    if !shutdown::drain(&tracker, config.shutdown.grace_period()).await {
        tracing::warn!("Exiting with tool calls still running");
    }
    served?;

    if signalled {
        // The stdin reader thread never returns on its own, so don't wait
        // for the runtime to wind down.
        tracing::info!("Shutdown complete");
        std::process::exit(0);
    }

    Ok(())
}
