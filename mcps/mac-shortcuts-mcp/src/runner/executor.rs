//! Async executor for the shortcuts CLI
//!
//! [`ShortcutRunner`] resolves the `shortcuts` executable on a search path,
//! launches it with the shortcut name and optional `--input` text, and waits
//! for the process while racing an optional timeout and the caller's
//! cancellation token. A process that loses the race is killed and reaped
//! before `run` returns.
//!
//! # Example
//!
//! ```rust,ignore
//! use mac_shortcuts_mcp::{ShortcutExecutor, ShortcutRequest, ShortcutRunner};
//!
//! let runner = ShortcutRunner::new();
//! let request = ShortcutRequest::new("Get Weather").with_timeout(10.0);
//! let result = runner.run(&request, CancellationToken::new()).await?;
//! println!("{}", result.stdout);
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use mcp_common::CancellationToken;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, instrument, warn};

use super::error::{RunnerError, RunnerResult};
use crate::params::ShortcutRequest;
use crate::types::ExecutionResult;

/// Executable name looked up when none is configured
pub const DEFAULT_PROGRAM: &str = "shortcuts";

/// Something that can run a shortcut
///
/// The tool handler only depends on this trait, so tests can substitute a
/// recording or scripted implementation.
#[async_trait]
pub trait ShortcutExecutor: Send + Sync + 'static {
    /// Run a shortcut to completion, timeout or cancellation
    ///
    /// Non-zero exits and timeouts are reported in the returned result.
    /// When `cancel` fires the child is killed and [`RunnerError::Cancelled`]
    /// is returned.
    async fn run(
        &self,
        request: &ShortcutRequest,
        cancel: CancellationToken,
    ) -> RunnerResult<ExecutionResult>;
}

/// Runs shortcuts through the `shortcuts` command line tool
#[derive(Debug, Clone)]
pub struct ShortcutRunner {
    program: String,
    search_path: Option<OsString>,
}

impl Default for ShortcutRunner {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            search_path: None,
        }
    }
}

impl ShortcutRunner {
    /// Runner for `shortcuts` on the process `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or path
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Search these directories instead of `PATH`
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Locate the executable, if it exists
    pub fn resolve(&self) -> Option<PathBuf> {
        let search_path = match &self.search_path {
            Some(path) => Some(path.clone()),
            None => std::env::var_os("PATH"),
        };
        resolve_executable(&self.program, search_path.as_deref())
    }
}

#[async_trait]
impl ShortcutExecutor for ShortcutRunner {
    #[instrument(skip(self, request, cancel), fields(shortcut = %request.shortcut_name))]
    async fn run(
        &self,
        request: &ShortcutRequest,
        cancel: CancellationToken,
    ) -> RunnerResult<ExecutionResult> {
        let program = self.resolve().ok_or_else(|| RunnerError::Unavailable {
            program: self.program.clone(),
        })?;

        let command = build_command(&program, request);
        debug!("executing: {}", command.join(" "));

        let mut child = Command::new(&program)
            .args(&command[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::LaunchFailed {
                program: self.program.clone(),
                source,
            })?;

        let outcome = {
            let stdout = child.stdout.take();
            let stderr = child.stderr.take();
            let completion = collect_output(&mut child, stdout, stderr);
            tokio::pin!(completion);

            let deadline = async {
                match request.timeout_duration() {
                    Some(limit) => tokio::time::sleep(limit).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                output = &mut completion => Outcome::Finished(output),
                _ = deadline => Outcome::TimedOut,
                _ = cancel.cancelled() => Outcome::Cancelled,
            }
        };

        match outcome {
            Outcome::Finished(output) => {
                let (status, stdout, stderr) = output?;
                let return_code = exit_code(status);
                debug!(?return_code, "shortcut finished");
                Ok(ExecutionResult {
                    command,
                    return_code,
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                    timed_out: false,
                })
            }
            Outcome::TimedOut => {
                info!(timeout = ?request.timeout, "shortcut timed out, killing process");
                terminate(&mut child).await;
                Ok(ExecutionResult::timed_out(command))
            }
            Outcome::Cancelled => {
                info!("shortcut run cancelled, killing process");
                terminate(&mut child).await;
                Err(RunnerError::Cancelled)
            }
        }
    }
}

enum Outcome {
    Finished(std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)>),
    TimedOut,
    Cancelled,
}

/// Build the argv for a request, with the resolved executable first
fn build_command(program: &Path, request: &ShortcutRequest) -> Vec<String> {
    let mut command = vec![
        program.to_string_lossy().into_owned(),
        "run".to_string(),
        request.shortcut_name.clone(),
    ];
    if let Some(text) = request.text_input.as_deref().filter(|t| !t.is_empty()) {
        command.push("--input".to_string());
        command.push(text.to_string());
    }
    command
}

/// Exit code, or the negated signal number when the process was killed
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;

    status.code().or_else(|| status.signal().map(|signal| -signal))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> Option<i32> {
    status.code()
}

/// Wait for exit while draining both pipes
async fn collect_output(
    child: &mut Child,
    stdout: Option<impl AsyncRead + Unpin>,
    stderr: Option<impl AsyncRead + Unpin>,
) -> std::io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
}

async fn read_pipe(pipe: Option<impl AsyncRead + Unpin>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Force-kill the child and reap it
async fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!(error = %e, "failed to kill shortcut process");
    }
    if let Err(e) = child.wait().await {
        warn!(error = %e, "failed to reap shortcut process");
    }
}

/// Find `program` on `search_path`
///
/// A program containing a path separator is checked directly.
fn resolve_executable(program: &str, search_path: Option<&std::ffi::OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.is_absolute() || program.contains('/') || program.contains('\\') {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    std::env::split_paths(search_path?)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
