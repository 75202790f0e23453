//! JSON schemas declared for `run_shortcut`

use std::sync::Arc;

use mcp_common::{schema_for_type, JsonObject};

use crate::params::RunShortcutArgs;
use crate::types::StructuredOutput;

/// Input schema: `shortcutName` required, `textInput` and `timeoutSeconds` optional
pub fn input_schema() -> Arc<JsonObject> {
    schema_for_type::<RunShortcutArgs>()
}

/// Output schema derived from [`StructuredOutput`]
pub fn output_schema() -> Arc<JsonObject> {
    schema_for_type::<StructuredOutput<'static>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExecutionResult;
    use serde_json::{json, Value};

    #[test]
    fn test_input_schema_requires_name_only() {
        let schema = input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["shortcutName"]));
        assert_eq!(schema["additionalProperties"], false);

        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties["shortcutName"]["type"], "string");
        assert_eq!(properties["shortcutName"]["minLength"], 1);
        assert_eq!(properties["timeoutSeconds"]["exclusiveMinimum"], 0);
        assert!(properties["textInput"]["description"]
            .as_str()
            .is_some_and(|d| d.contains("--input")));
    }

    #[test]
    fn test_output_schema_covers_structured_fields() {
        let schema = output_schema();
        let result = ExecutionResult::timed_out(vec!["shortcuts".into()]);
        let Value::Object(structured) = serde_json::to_value(result.structured()).unwrap() else {
            panic!("structured output must be an object");
        };

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);

        let properties = schema["properties"].as_object().unwrap();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(properties.len(), structured.len());
        assert_eq!(required.len(), structured.len());
        for key in structured.keys() {
            assert!(properties.contains_key(key), "missing property {key}");
            assert!(required.contains(&json!(key)), "{key} not required");
        }
    }

    #[test]
    fn test_return_code_is_nullable_integer() {
        let schema = output_schema();
        let return_code = &schema["properties"]["returnCode"];
        assert_eq!(return_code["type"], "integer");
        assert_eq!(return_code["nullable"], true);
        assert_eq!(schema["properties"]["command"]["items"]["type"], "string");
    }
}
