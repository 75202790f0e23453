//! `run_shortcut` tool handler
//!
//! Validates the raw arguments, hands the request to a [`ShortcutExecutor`]
//! and turns the [`ExecutionResult`] into a summary text plus the structured
//! payload declared by the output schema.

use std::sync::Arc;

use mcp_common::{
    async_trait, internal_error, structured_success, CallToolResult, CancellationToken,
    JsonObject, ToolError, ToolHandler, ToolResult,
};
use tracing::{debug, warn};

use crate::params::ShortcutRequest;
use crate::runner::{RunnerError, ShortcutExecutor};
use crate::types::ExecutionResult;

/// Handler bound to the `run_shortcut` tool
pub struct RunShortcutHandler {
    executor: Arc<dyn ShortcutExecutor>,
}

impl RunShortcutHandler {
    pub fn new(executor: Arc<dyn ShortcutExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ToolHandler for RunShortcutHandler {
    async fn call(
        &self,
        arguments: JsonObject,
        cancel: CancellationToken,
    ) -> ToolResult<CallToolResult> {
        let request = ShortcutRequest::from_arguments(&arguments).map_err(|e| {
            debug!(field = e.field, "rejected run_shortcut arguments");
            ToolError::rejected(e.to_string())
        })?;

        let result = self
            .executor
            .run(&request, cancel)
            .await
            .map_err(runner_error)?;

        let summary = summarize(&request, &result);
        Ok(structured_success(summary, &result.structured())?)
    }
}

fn runner_error(err: RunnerError) -> ToolError {
    match err {
        RunnerError::Cancelled => internal_error(err.to_string()).into(),
        other => {
            warn!(error = %other, "shortcut could not be run");
            ToolError::rejected(other.to_string())
        }
    }
}

/// Human-readable summary of a run
///
/// A status line, then the trimmed stdout and stderr in their own sections,
/// separated by blank lines.
pub fn summarize(request: &ShortcutRequest, result: &ExecutionResult) -> String {
    let name = &request.shortcut_name;
    let mut sections = Vec::new();

    if result.timed_out {
        sections.push(match request.timeout {
            Some(seconds) => format!(
                "Shortcut '{name}' timed out after {} seconds.",
                format_seconds(seconds)
            ),
            None => format!("Shortcut '{name}' timed out."),
        });
    } else if result.succeeded() {
        sections.push(format!("Shortcut '{name}' completed successfully."));
    } else {
        let code = result
            .return_code
            .map_or_else(|| "None".to_string(), |code| code.to_string());
        sections.push(format!("Shortcut '{name}' exited with return code {code}."));
    }

    let stdout = result.stdout.trim();
    if !stdout.is_empty() {
        sections.push(format!("--- stdout ---\n{stdout}"));
    }
    let stderr = result.stderr.trim();
    if !stderr.is_empty() {
        sections.push(format!("--- stderr ---\n{stderr}"));
    }

    if sections.is_empty() {
        "No output produced.".to_string()
    } else {
        sections.join("\n\n")
    }
}

/// Render a float the way a Python `repr` would
///
/// Plain decimals keep a fractional part (`5.0`). Magnitudes below `1e-4` or
/// from `1e16` up use a signed two-digit exponent (`1e-05`, `1.5e+16`).
fn format_seconds(seconds: f64) -> String {
    let scientific = format!("{seconds:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if seconds == 0.0 || (-4..16).contains(&exponent) {
        let plain = seconds.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(code: Option<i32>, stdout: &str, stderr: &str) -> ExecutionResult {
        ExecutionResult {
            command: vec!["shortcuts".into(), "run".into(), "Get Weather".into()],
            return_code: code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: false,
        }
    }

    #[test]
    fn test_summary_success_with_stdout() {
        let request = ShortcutRequest::new("Get Weather");
        assert_eq!(
            summarize(&request, &result(Some(0), "Sunny 72F\n", "")),
            "Shortcut 'Get Weather' completed successfully.\n\n--- stdout ---\nSunny 72F"
        );
    }

    #[test]
    fn test_summary_failure_with_both_streams() {
        let request = ShortcutRequest::new("Get Weather");
        assert_eq!(
            summarize(&request, &result(Some(2), " partial ", "boom\n")),
            "Shortcut 'Get Weather' exited with return code 2.\n\n\
             --- stdout ---\npartial\n\n--- stderr ---\nboom"
        );
    }

    #[test]
    fn test_summary_killed_by_signal() {
        let request = ShortcutRequest::new("Get Weather");
        assert_eq!(
            summarize(&request, &result(Some(-9), "", "  ")),
            "Shortcut 'Get Weather' exited with return code -9."
        );
    }

    #[test]
    fn test_summary_timeout_keeps_fraction() {
        let timed_out = ExecutionResult::timed_out(vec!["shortcuts".into()]);

        let request = ShortcutRequest::new("Slow Task").with_timeout(0.1);
        assert_eq!(
            summarize(&request, &timed_out),
            "Shortcut 'Slow Task' timed out after 0.1 seconds."
        );

        let request = ShortcutRequest::new("Slow Task").with_timeout(5.0);
        assert_eq!(
            summarize(&request, &timed_out),
            "Shortcut 'Slow Task' timed out after 5.0 seconds."
        );

        let request = ShortcutRequest::new("Slow Task");
        assert_eq!(summarize(&request, &timed_out), "Shortcut 'Slow Task' timed out.");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.1), "0.1");
        assert_eq!(format_seconds(5.0), "5.0");
        assert_eq!(format_seconds(30.0), "30.0");
        assert_eq!(format_seconds(0.0001), "0.0001");
        assert_eq!(format_seconds(1e15), "1000000000000000.0");
        assert_eq!(format_seconds(0.00001), "1e-05");
        assert_eq!(format_seconds(1.5e-7), "1.5e-07");
        assert_eq!(format_seconds(1e16), "1e+16");
        assert_eq!(format_seconds(2.5e100), "2.5e+100");
    }

    #[test]
    fn test_cancelled_is_protocol_error() {
        assert!(matches!(
            runner_error(RunnerError::Cancelled),
            ToolError::Protocol(_)
        ));
        assert!(matches!(
            runner_error(RunnerError::Unavailable {
                program: "shortcuts".into()
            }),
            ToolError::Rejected(_)
        ));
    }
}
