//! Streamable HTTP transport
//!
//! Serves the app at `/mcp` using rmcp's `StreamableHttpService` inside an
//! axum router. TLS is provided by `axum-server` with rustls when a
//! certificate/key pair is configured.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use axum_server::tls_rustls::RustlsConfig;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::json_response::buffer_sse_reply;
use super::rebinding::{check_request, RebindingGuard};
use crate::server::McpApp;

/// Path the MCP endpoint is mounted at
pub const MCP_PATH: &str = "/mcp";

/// How long open connections get to close after shutdown starts
const CONNECTION_GRACE: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("--certfile and --keyfile must be provided together")]
    IncompleteTlsPair,

    #[error("TLS file not found: {0}")]
    TlsFileMissing(PathBuf),
}

/// Certificate and private key for HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub certfile: PathBuf,
    pub keyfile: PathBuf,
}

impl TlsFiles {
    /// Validate an optional certificate/key pair
    ///
    /// Both or neither must be given, and both files must exist.
    pub fn from_pair(
        certfile: Option<PathBuf>,
        keyfile: Option<PathBuf>,
    ) -> Result<Option<Self>, TransportError> {
        match (certfile, keyfile) {
            (None, None) => Ok(None),
            (Some(certfile), Some(keyfile)) => {
                for path in [&certfile, &keyfile] {
                    if !path.is_file() {
                        return Err(TransportError::TlsFileMissing(path.clone()));
                    }
                }
                Ok(Some(Self { certfile, keyfile }))
            }
            _ => Err(TransportError::IncompleteTlsPair),
        }
    }
}

/// Options for the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub addr: SocketAddr,
    /// Return buffered JSON bodies instead of SSE streams
    pub json_response: bool,
    /// Disable session reuse
    pub stateless: bool,
    pub allowed_hosts: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub tls: Option<TlsFiles>,
}

/// Build the axum router serving `app`
pub fn router(app: McpApp, options: &HttpOptions, shutdown: &CancellationToken) -> Router {
    let config = StreamableHttpServerConfig {
        stateful_mode: !options.stateless,
        cancellation_token: shutdown.child_token(),
        ..Default::default()
    };

    let service = StreamableHttpService::new(
        move || Ok(app.clone()),
        Arc::new(LocalSessionManager::default()),
        config,
    );

    let mut router = Router::new().nest_service(MCP_PATH, service);

    if options.json_response {
        router = router.layer(middleware::from_fn(buffer_sse_reply));
    }

    match RebindingGuard::new(&options.allowed_hosts, &options.allowed_origins) {
        Some(guard) => {
            tracing::info!("DNS rebinding protection enabled");
            router = router.layer(middleware::from_fn_with_state(
                Arc::new(guard),
                check_request,
            ));
        }
        None => tracing::debug!("DNS rebinding protection disabled"),
    }

    router
}

/// Serve the app over HTTP(S) until `shutdown` is cancelled
pub async fn serve_http(
    app: McpApp,
    options: HttpOptions,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let name = app.metadata().name.clone();
    let tools = app.registry().len();
    let router = router(app, &options, &shutdown);

    match &options.tls {
        None => {
            let listener = tokio::net::TcpListener::bind(options.addr).await?;
            tracing::info!(
                server = %name,
                tools,
                json_response = options.json_response,
                stateless = options.stateless,
                "Listening on http://{}{}",
                listener.local_addr()?,
                MCP_PATH
            );

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await?;
        }
        Some(tls) => {
            let config = RustlsConfig::from_pem_file(&tls.certfile, &tls.keyfile).await?;
            let handle = axum_server::Handle::new();

            let watcher = handle.clone();
            let signal = shutdown.clone();
            tokio::spawn(async move {
                signal.cancelled().await;
                watcher.graceful_shutdown(Some(CONNECTION_GRACE));
            });

            tracing::info!(
                server = %name,
                tools,
                json_response = options.json_response,
                stateless = options.stateless,
                "Listening on https://{}{}",
                options.addr,
                MCP_PATH
            );

            axum_server::bind_rustls(options.addr, config)
                .handle(handle)
                .serve(router.into_make_service())
                .await?;
        }
    }

    tracing::info!("HTTP transport stopped");
    Ok(())
}
