//! Parameter types for the `run_shortcut` tool
//!
//! Arguments arrive as a raw JSON object. They are decoded once into a
//! [`ShortcutRequest`], checking fields in declaration order and stopping at
//! the first invalid one.

use std::time::Duration;

use mcp_common::JsonObject;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Wire shape of the `run_shortcut` arguments, source of the input schema
///
/// Decoding goes through [`ShortcutRequest::from_arguments`] so every field
/// gets its own validation message.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunShortcutArgs {
    #[schemars(description = "Display name of the shortcut to execute.", length(min = 1))]
    pub shortcut_name: String,

    #[schemars(
        description = "Optional text forwarded to the shortcut via the `--input` argument."
    )]
    pub text_input: Option<String>,

    #[schemars(
        description = "Maximum seconds to wait for the shortcut before aborting.",
        extend("exclusiveMinimum" = 0)
    )]
    pub timeout_seconds: Option<f64>,
}

/// A caller-supplied argument that failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{field}` {reason}")]
pub struct InvalidArgument {
    /// Argument name as it appears in the input schema
    pub field: &'static str,
    pub reason: &'static str,
}

impl InvalidArgument {
    fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// A validated request to run one shortcut
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutRequest {
    /// Display name of the shortcut, trimmed
    pub shortcut_name: String,
    /// Text forwarded with `--input`
    pub text_input: Option<String>,
    /// Seconds to wait before killing the process, always positive
    pub timeout: Option<f64>,
}

impl ShortcutRequest {
    pub fn new(shortcut_name: impl Into<String>) -> Self {
        Self {
            shortcut_name: shortcut_name.into(),
            text_input: None,
            timeout: None,
        }
    }

    pub fn with_text_input(mut self, text: impl Into<String>) -> Self {
        self.text_input = Some(text.into());
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Decode and validate raw tool arguments
    ///
    /// A `null` value is treated the same as an absent one.
    pub fn from_arguments(arguments: &JsonObject) -> Result<Self, InvalidArgument> {
        Ok(Self {
            shortcut_name: shortcut_name(arguments.get("shortcutName"))?,
            text_input: text_input(arguments.get("textInput"))?,
            timeout: timeout_seconds(arguments.get("timeoutSeconds"))?,
        })
    }

    /// The timeout as a [`Duration`]
    ///
    /// Values too large to represent mean no deadline.
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn shortcut_name(value: Option<&Value>) -> Result<String, InvalidArgument> {
    match present(value) {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        _ => Err(InvalidArgument::new(
            "shortcutName",
            "must be a non-empty string.",
        )),
    }
}

fn text_input(value: Option<&Value>) -> Result<Option<String>, InvalidArgument> {
    match present(value) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(InvalidArgument::new(
            "textInput",
            "must be a string when provided.",
        )),
    }
}

fn timeout_seconds(value: Option<&Value>) -> Result<Option<f64>, InvalidArgument> {
    let seconds = match present(value) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_f64().filter(|s| s.is_finite()),
        Some(_) => None,
    };

    match seconds {
        None => Err(InvalidArgument::new(
            "timeoutSeconds",
            "must be a number when provided.",
        )),
        Some(s) if s <= 0.0 => Err(InvalidArgument::new(
            "timeoutSeconds",
            "must be greater than 0.",
        )),
        Some(s) => Ok(Some(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_full_request() {
        let request = ShortcutRequest::from_arguments(&args(json!({
            "shortcutName": "  Get Weather ",
            "textInput": "Paris",
            "timeoutSeconds": 10,
        })))
        .unwrap();

        assert_eq!(request.shortcut_name, "Get Weather");
        assert_eq!(request.text_input.as_deref(), Some("Paris"));
        assert_eq!(request.timeout, Some(10.0));
    }

    #[test]
    fn test_nulls_are_absent() {
        let request = ShortcutRequest::from_arguments(&args(json!({
            "shortcutName": "Ping",
            "textInput": null,
            "timeoutSeconds": null,
        })))
        .unwrap();

        assert_eq!(request, ShortcutRequest::new("Ping"));
    }

    #[test]
    fn test_shortcut_name_rejections() {
        for value in [json!({}), json!({"shortcutName": "   "}), json!({"shortcutName": 7})] {
            let err = ShortcutRequest::from_arguments(&args(value)).unwrap_err();
            assert_eq!(err.field, "shortcutName");
            assert_eq!(err.to_string(), "`shortcutName` must be a non-empty string.");
        }
    }

    #[test]
    fn test_text_input_must_be_string() {
        let err = ShortcutRequest::from_arguments(&args(json!({
            "shortcutName": "Ping",
            "textInput": ["a"],
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "`textInput` must be a string when provided.");
    }

    #[test]
    fn test_timeout_rejections() {
        for timeout in [json!(0), json!(-1), json!(0.0)] {
            let err = ShortcutRequest::from_arguments(&args(json!({
                "shortcutName": "Ping",
                "timeoutSeconds": timeout,
            })))
            .unwrap_err();
            assert_eq!(err.to_string(), "`timeoutSeconds` must be greater than 0.");
        }

        for timeout in [json!("5"), json!(true)] {
            let err = ShortcutRequest::from_arguments(&args(json!({
                "shortcutName": "Ping",
                "timeoutSeconds": timeout,
            })))
            .unwrap_err();
            assert_eq!(err.to_string(), "`timeoutSeconds` must be a number when provided.");
        }
    }

    #[test]
    fn test_name_checked_before_timeout() {
        let err = ShortcutRequest::from_arguments(&args(json!({
            "shortcutName": "",
            "timeoutSeconds": -1,
        })))
        .unwrap_err();
        assert_eq!(err.field, "shortcutName");
    }

    #[test]
    fn test_timeout_duration() {
        let request = ShortcutRequest::new("Slow Task").with_timeout(0.5);
        assert_eq!(request.timeout_duration(), Some(Duration::from_millis(500)));
        assert_eq!(ShortcutRequest::new("Ping").timeout_duration(), None);
        assert_eq!(
            ShortcutRequest::new("Ping").with_timeout(f64::MAX).timeout_duration(),
            None
        );
    }
}
