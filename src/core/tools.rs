//! Local tool dispatch.
//!
//! The model can ask for a named capability to be run on its behalf. The
//! set of capabilities is closed per conversation: a call either hits a
//! registered handler or fails the whole turn. Unknown names are never
//! silently skipped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde_json::Value;

use crate::core::error::LlmError;
use crate::responses::request::{FunctionCallOutput, FunctionTool, ToolDefinition};
use crate::responses::response::FunctionCall;

/// A named capability the model may invoke during a turn.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Wire definition advertised to the model.
    fn definition(&self) -> FunctionTool;

    /// Run the tool against parsed arguments.
    async fn invoke(&self, arguments: Value) -> Result<Value, LlmError>;
}

/// The closed set of tools available to one conversation.
pub struct ToolSet {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under the name its definition declares.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let definition = handler.definition();
        self.handlers.insert(definition.name, handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Wire definitions for every registered tool.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.handlers
            .values()
            .map(|handler| ToolDefinition::Function(handler.definition()))
            .collect()
    }

    /// Answer one call from the model.
    ///
    /// Produces exactly one result, tagged with the identifier of the call
    /// it answers. A name outside the registered set fails with
    /// [`LlmError::ToolNotFound`] before any tool runs.
    pub async fn dispatch(&self, call: &FunctionCall) -> Result<FunctionCallOutput, LlmError> {
        let handler = self
            .handlers
            .get(&call.name)
            .ok_or_else(|| LlmError::ToolNotFound(call.name.clone()))?;

        let arguments = parse_arguments(&call.arguments)?;
        let output = handler.invoke(arguments).await?;
        Ok(FunctionCallOutput::new(call.call_id.clone(), output))
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize an argument payload. The wire encodes arguments as a JSON
/// string; some gateways inline the object instead.
pub(crate) fn parse_arguments(arguments: &Value) -> Result<Value, LlmError> {
    match arguments {
        Value::String(s) => serde_json::from_str(s).map_err(|e| LlmError::Parse {
            message: format!("Failed to parse tool arguments: {s}"),
            source: Some(Box::new(e)),
        }),
        other => Ok(other.clone()),
    }
}

/// Derive a function tool definition from a parameter type.
///
/// The schema comes out of `schemars`; strict mode requires every property
/// to appear in the `required` array, so the whole property list is copied
/// there.
pub fn function_tool<T: JsonSchema>(
    name: impl Into<String>,
    description: impl Into<String>,
) -> Result<FunctionTool, LlmError> {
    let schema = schema_for!(T);
    let mut parameters = serde_json::to_value(&schema).map_err(|e| LlmError::Parse {
        message: "Failed to serialize tool parameter schema".to_string(),
        source: Some(Box::new(e)),
    })?;

    if let Some(object) = parameters.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }

    if let Some(properties) = parameters.get("properties").and_then(|p| p.as_object()) {
        let all_property_names: Vec<Value> = properties
            .keys()
            .map(|k| Value::String(k.clone()))
            .collect();

        if let Some(object) = parameters.as_object_mut() {
            object.insert("required".to_string(), Value::Array(all_property_names));
            object.insert("additionalProperties".to_string(), Value::Bool(false));
        }
    }

    Ok(FunctionTool {
        name: name.into(),
        description: Some(description.into()),
        parameters,
        strict: true,
    })
}

/// Bounds for the tool dispatch loop.
#[derive(Debug, Clone)]
pub struct DispatchLimits {
    /// Maximum number of request rounds in one turn (default: 8).
    pub max_rounds: u32,
    /// Wall-clock budget for the whole turn (default: 5 minutes).
    pub timeout: Duration,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            max_rounds: 8,
            timeout: Duration::from_secs(300),
        }
    }
}

impl DispatchLimits {
    pub fn new(max_rounds: u32, timeout: Duration) -> Self {
        Self {
            max_rounds,
            timeout,
        }
    }
}

/// Tracks rounds within one dispatch loop so a misbehaving service cannot
/// keep the turn alive forever.
#[derive(Debug, Clone)]
pub struct DispatchGuard {
    max_rounds: u32,
    rounds: u32,
}

impl DispatchGuard {
    pub fn new(limits: &DispatchLimits) -> Self {
        Self {
            max_rounds: limits.max_rounds,
            rounds: 0,
        }
    }

    /// Count a new round, failing once the cap is exceeded.
    pub fn begin_round(&mut self) -> Result<(), LlmError> {
        self.rounds = self.rounds.saturating_add(1);
        if self.rounds > self.max_rounds {
            return Err(LlmError::ToolRoundLimit {
                limit: self.max_rounds,
            });
        }
        Ok(())
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn definition(&self) -> FunctionTool {
            FunctionTool {
                name: "echo".to_string(),
                description: Some("Returns its arguments".to_string()),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": { "value": { "type": "string" } },
                    "required": ["value"],
                    "additionalProperties": false
                }),
                strict: true,
            }
        }

        async fn invoke(&self, arguments: Value) -> Result<Value, LlmError> {
            Ok(serde_json::json!({ "echoed": arguments["value"] }))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        fn definition(&self) -> FunctionTool {
            FunctionTool {
                name: "unreliable".to_string(),
                description: None,
                parameters: serde_json::json!({ "type": "object", "properties": {} }),
                strict: true,
            }
        }

        async fn invoke(&self, _arguments: Value) -> Result<Value, LlmError> {
            Err(LlmError::ToolExecution {
                name: "unreliable".to_string(),
                message: "backend unavailable".to_string(),
            })
        }
    }

    fn call(name: &str, arguments: Value) -> FunctionCall {
        FunctionCall {
            id: Some("fc_1".to_string()),
            call_id: "call_1".to_string(),
            name: name.to_string(),
            arguments,
            status: None,
        }
    }

    #[tokio::test]
    async fn dispatch_tags_output_with_call_id() {
        let mut tools = ToolSet::new();
        tools.register(Arc::new(EchoTool));

        let output = tools
            .dispatch(&call("echo", serde_json::json!({ "value": "hi" })))
            .await
            .unwrap();

        assert_eq!(output.call_id, "call_1");
        assert_eq!(output.r#type, "function_call_output");
        // Structured output stays structured, not stringified.
        assert_eq!(output.output["echoed"], "hi");
    }

    #[tokio::test]
    async fn dispatch_parses_string_encoded_arguments() {
        let mut tools = ToolSet::new();
        tools.register(Arc::new(EchoTool));

        let output = tools
            .dispatch(&call("echo", Value::String("{\"value\":\"wired\"}".to_string())))
            .await
            .unwrap();
        assert_eq!(output.output["echoed"], "wired");
    }

    #[tokio::test]
    async fn dispatch_fails_fast_on_unknown_name() {
        let mut tools = ToolSet::new();
        tools.register(Arc::new(EchoTool));

        let err = tools
            .dispatch(&call("get_stock_price", serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ToolNotFound(name) if name == "get_stock_price"));
    }

    #[tokio::test]
    async fn dispatch_propagates_handler_failure() {
        let mut tools = ToolSet::new();
        tools.register(Arc::new(FailingTool));

        let err = tools
            .dispatch(&call("unreliable", serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ToolExecution { .. }));
    }

    #[test]
    fn parse_arguments_rejects_malformed_strings() {
        let err = parse_arguments(&Value::String("not json".to_string())).unwrap_err();
        assert!(matches!(err, LlmError::Parse { .. }));
    }

    #[test]
    fn function_tool_derives_strict_schema() {
        #[derive(JsonSchema)]
        #[allow(dead_code)]
        struct WeatherParams {
            /// Name of the city to look up.
            city: String,
            unit: Option<String>,
        }

        let tool = function_tool::<WeatherParams>("get_weather", "Look up the weather").unwrap();
        assert_eq!(tool.name, "get_weather");
        assert!(tool.strict);

        let parameters = tool.parameters.as_object().unwrap();
        assert!(!parameters.contains_key("title"));
        assert!(parameters["properties"].get("city").is_some());

        let required: Vec<&str> = parameters["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"city"));
        assert!(required.contains(&"unit"));
        assert_eq!(parameters["additionalProperties"], false);
    }

    #[test]
    fn guard_counts_rounds_up_to_the_cap() {
        let limits = DispatchLimits::new(3, Duration::from_secs(60));
        let mut guard = DispatchGuard::new(&limits);

        assert!(guard.begin_round().is_ok());
        assert!(guard.begin_round().is_ok());
        assert!(guard.begin_round().is_ok());
        assert_eq!(guard.rounds(), 3);

        let err = guard.begin_round().unwrap_err();
        assert!(matches!(err, LlmError::ToolRoundLimit { limit: 3 }));
    }

    #[test]
    fn limits_default_bounds() {
        let limits = DispatchLimits::default();
        assert_eq!(limits.max_rounds, 8);
        assert_eq!(limits.timeout, Duration::from_secs(300));
    }
}
