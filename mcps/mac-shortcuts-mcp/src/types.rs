//! Type definitions for the shortcuts MCP

use schemars::JsonSchema;
use serde::Serialize;

/// Outcome of one shortcut run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exact argv that was launched, resolved executable first
    pub command: Vec<String>,
    /// Exit code, negated signal number when killed, `None` after a timeout
    pub return_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Result for a run that was killed at its deadline
    ///
    /// Output captured before the kill is discarded.
    pub fn timed_out(command: Vec<String>) -> Self {
        Self {
            command,
            return_code: None,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: true,
        }
    }

    /// True when the shortcut finished on its own with exit code 0
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.return_code == Some(0)
    }

    /// Borrowed view serialized as the tool's structured content
    pub fn structured(&self) -> StructuredOutput<'_> {
        StructuredOutput {
            command: &self.command,
            return_code: self.return_code,
            stdout: &self.stdout,
            stderr: &self.stderr,
            timed_out: self.timed_out,
            succeeded: self.succeeded(),
        }
    }
}

/// Structured payload, also the source of the tool's output schema
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StructuredOutput<'a> {
    #[schemars(description = "Command that was executed.")]
    pub command: &'a [String],
    #[schemars(
        description = "Process return code when available.",
        required,
        extend("type" = ["integer", "null"])
    )]
    pub return_code: Option<i32>,
    #[schemars(description = "Captured standard output from the shortcut.")]
    pub stdout: &'a str,
    #[schemars(description = "Captured standard error from the shortcut.")]
    pub stderr: &'a str,
    #[schemars(description = "True if execution timed out.")]
    pub timed_out: bool,
    #[schemars(description = "True when the shortcut completed successfully.")]
    pub succeeded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finished(code: Option<i32>) -> ExecutionResult {
        ExecutionResult {
            command: vec!["/usr/bin/shortcuts".into(), "run".into(), "Ping".into()],
            return_code: code,
            stdout: "pong\n".into(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    #[test]
    fn test_succeeded_only_on_zero() {
        assert!(finished(Some(0)).succeeded());
        assert!(!finished(Some(1)).succeeded());
        assert!(!finished(None).succeeded());
        assert!(!ExecutionResult::timed_out(vec![]).succeeded());
    }

    #[test]
    fn test_structured_field_names() {
        let value = serde_json::to_value(finished(Some(0)).structured()).unwrap();
        assert_eq!(
            value,
            json!({
                "command": ["/usr/bin/shortcuts", "run", "Ping"],
                "returnCode": 0,
                "stdout": "pong\n",
                "stderr": "",
                "timedOut": false,
                "succeeded": true,
            })
        );
    }

    #[test]
    fn test_timed_out_has_null_return_code() {
        let value = serde_json::to_value(ExecutionResult::timed_out(vec!["x".into()]).structured())
            .unwrap();
        assert!(value["returnCode"].is_null());
        assert_eq!(value["timedOut"], true);
        assert_eq!(value["succeeded"], false);
    }
}
