use serde::Deserialize;
use serde_json::Value;

use crate::responses::request::Role;

/// One exchange with the service, as the service reports it.
///
/// Everything except `id` is optional on the wire: streaming lifecycle
/// events carry partial snapshots of this same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Opaque handle for this exchange. Links follow-up turns and drives
    /// retrieval and deletion.
    pub id: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub status: Option<Status>,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub previous_response_id: Option<String>,

    #[serde(default)]
    pub usage: Option<Usage>,

    #[serde(default)]
    pub error: Option<ResponseError>,
}

impl Response {
    /// Concatenated text of all message output, refusals excluded.
    pub fn output_text(&self) -> String {
        let mut text = String::new();
        for item in &self.output {
            if let OutputItem::Message(message) = item {
                for part in &message.content {
                    if let MessageContent::OutputText { text: t } = part {
                        text.push_str(t);
                    }
                }
            }
        }
        text
    }

    /// Identifier of the first output item, when the service assigned one.
    pub fn first_output_id(&self) -> Option<&str> {
        match self.output.first() {
            Some(OutputItem::Message(message)) => Some(&message.id),
            Some(OutputItem::FunctionCall(call)) => call.id.as_deref(),
            Some(OutputItem::CodeInterpreterCall(call)) => Some(&call.id),
            _ => None,
        }
    }

    /// Function calls the model wants answered, in output order.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::FunctionCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// The model's refusal explanation, if it declined to answer.
    pub fn refusal(&self) -> Option<&str> {
        for item in &self.output {
            if let OutputItem::Message(message) = item {
                for part in &message.content {
                    if let MessageContent::Refusal { refusal } = part {
                        return Some(refusal);
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Completed,
    Incomplete,
    Failed,
    /// Statuses this crate does not track explicitly (queued, cancelled).
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message(OutputMessage),
    FunctionCall(FunctionCall),
    CodeInterpreterCall(CodeInterpreterCall),
    /// Item kinds this crate does not consume (reasoning, web search, ...).
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputMessage {
    pub id: String,

    #[serde(default)]
    pub status: Option<Status>,

    /// This is always `assistant`.
    pub role: Role,

    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    OutputText {
        text: String,
    },
    Refusal {
        /// The refusal explanation from the model.
        refusal: String,
    },
    #[serde(other)]
    Other,
}

/// Request from the model to run one named tool.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    /// Output item identifier (distinct from the call identifier).
    #[serde(default)]
    pub id: Option<String>,

    /// Identifier the matching result must carry.
    pub call_id: String,

    pub name: String,

    /// JSON-encoded argument payload. Some gateways inline the object
    /// instead of encoding it as a string.
    pub arguments: Value,

    #[serde(default)]
    pub status: Option<Status>,
}

/// Server-side code execution performed by the built-in interpreter tool.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeInterpreterCall {
    pub id: String,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub container_id: Option<String>,

    #[serde(default)]
    pub outputs: Option<Value>,

    #[serde(default)]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Failure details attached to a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Acknowledgement returned by `DELETE /responses/{id}`.
///
/// Deleting the same handle again is a not-found failure, not a repeat of
/// this acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}

/// Page of input items that produced a stored response.
#[derive(Debug, Clone, Deserialize)]
pub struct InputItemList {
    #[serde(default)]
    pub data: Vec<ListedInputItem>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListedInputItem {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response() -> Value {
        serde_json::json!({
            "id": "resp_68a1",
            "object": "response",
            "model": "gpt-4o-mini",
            "status": "completed",
            "output": [
                {
                    "type": "message",
                    "id": "msg_68a1",
                    "status": "completed",
                    "role": "assistant",
                    "content": [
                        { "type": "output_text", "text": "The answer is ", "annotations": [] },
                        { "type": "output_text", "text": "4." }
                    ]
                }
            ],
            "usage": { "input_tokens": 12, "output_tokens": 5, "total_tokens": 17 }
        })
    }

    #[test]
    fn parses_full_response() {
        let response: Response = serde_json::from_value(full_response()).unwrap();
        assert_eq!(response.id, "resp_68a1");
        assert_eq!(response.status, Some(Status::Completed));
        assert_eq!(response.output_text(), "The answer is 4.");
        assert_eq!(response.first_output_id(), Some("msg_68a1"));
        assert!(response.function_calls().is_empty());
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(17));
    }

    #[test]
    fn parses_partial_stream_snapshot() {
        // Lifecycle events carry as little as an id and usage counters.
        let response: Response = serde_json::from_value(serde_json::json!({
            "id": "resp_partial",
            "usage": { "input_tokens": 1, "output_tokens": 2, "total_tokens": 3 }
        }))
        .unwrap();
        assert_eq!(response.id, "resp_partial");
        assert!(response.output.is_empty());
        assert_eq!(response.status, None);
    }

    #[test]
    fn extracts_function_calls_in_order() {
        let response: Response = serde_json::from_value(serde_json::json!({
            "id": "resp_tools",
            "output": [
                {
                    "type": "function_call",
                    "id": "fc_1",
                    "call_id": "call_1",
                    "name": "get_weather",
                    "arguments": "{\"city\":\"London\"}"
                },
                {
                    "type": "function_call",
                    "id": "fc_2",
                    "call_id": "call_2",
                    "name": "get_weather",
                    "arguments": "{\"city\":\"Tokyo\"}"
                }
            ]
        }))
        .unwrap();

        let calls = response.function_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].call_id, "call_1");
        assert_eq!(calls[1].call_id, "call_2");
        assert_eq!(response.output_text(), "");
    }

    #[test]
    fn surfaces_refusal() {
        let response: Response = serde_json::from_value(serde_json::json!({
            "id": "resp_refused",
            "output": [
                {
                    "type": "message",
                    "id": "msg_1",
                    "role": "assistant",
                    "content": [
                        { "type": "refusal", "refusal": "I can't help with that." }
                    ]
                }
            ]
        }))
        .unwrap();
        assert_eq!(response.refusal(), Some("I can't help with that."));
        assert_eq!(response.output_text(), "");
    }

    #[test]
    fn unknown_item_kinds_are_tolerated() {
        let response: Response = serde_json::from_value(serde_json::json!({
            "id": "resp_mixed",
            "status": "cancelled",
            "output": [
                { "type": "reasoning", "id": "rs_1", "summary": [] },
                {
                    "type": "message",
                    "id": "msg_1",
                    "role": "assistant",
                    "content": [ { "type": "output_text", "text": "done" } ]
                }
            ]
        }))
        .unwrap();
        assert_eq!(response.status, Some(Status::Unknown));
        assert_eq!(response.output_text(), "done");
        // The reasoning item still occupies the first output slot.
        assert_eq!(response.first_output_id(), None);
    }

    #[test]
    fn parses_delete_acknowledgement() {
        let deleted: Deleted = serde_json::from_value(serde_json::json!({
            "id": "resp_68a1",
            "object": "response",
            "deleted": true
        }))
        .unwrap();
        assert_eq!(deleted.id, "resp_68a1");
        assert!(deleted.deleted);
    }

    #[test]
    fn parses_input_item_list() {
        let list: InputItemList = serde_json::from_value(serde_json::json!({
            "object": "list",
            "data": [
                { "type": "message", "id": "msg_in_1", "role": "user" }
            ],
            "first_id": "msg_in_1",
            "last_id": "msg_in_1",
            "has_more": false
        }))
        .unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].role, Some(Role::User));
        assert!(!list.has_more);
    }
}
