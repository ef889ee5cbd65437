use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST /responses` call.
///
/// Optional fields are omitted from the wire entirely when unset; the
/// service applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest {
    pub model: String,

    pub input: Input,

    /// System-level guidance for the turn, kept outside the input list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Handle of the previous turn. The service replays that turn's full
    /// context server-side; nothing is resent locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,

    /// Cap on calls to built-in tools within one response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tool_calls: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Alter this or temperature but not both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Stable end-user identifier, forwarded for abuse monitoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CreateRequest {
    pub fn new(model: impl Into<String>, input: impl Into<Input>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            instructions: None,
            previous_response_id: None,
            stream: None,
            store: None,
            tools: None,
            tool_choice: None,
            parallel_tool_calls: None,
            max_tool_calls: None,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            user: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_store(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Turn input: either a bare prompt string or an explicit item list.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Input {
    Text(String),
    Items(Vec<InputItem>),
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<Vec<InputItem>> for Input {
    fn from(items: Vec<InputItem>) -> Self {
        Input::Items(items)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InputItem {
    Message(InputMessage),
    FunctionCallOutput(FunctionCallOutput),
}

impl InputItem {
    /// Plain-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        InputItem::Message(InputMessage {
            role: Role::User,
            content: Content::Text(text.into()),
        })
    }

    /// User message with typed content parts (text, images, files).
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        InputItem::Message(InputMessage {
            role: Role::User,
            content: Content::Parts(parts),
        })
    }

    pub fn message(role: Role, content: impl Into<Content>) -> Self {
        InputItem::Message(InputMessage {
            role,
            content: content.into(),
        })
    }

    /// Result for one tool call, tagged with the identifier of the call it
    /// answers.
    pub fn function_output(call_id: impl Into<String>, output: Value) -> Self {
        InputItem::FunctionCallOutput(FunctionCallOutput::new(call_id, output))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message content: a bare string or a list of typed parts.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for Content {
    fn from(parts: Vec<ContentPart>) -> Self {
        Content::Parts(parts)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText {
        text: String,
    },
    InputImage {
        /// Either an https URL or an inline `data:` URL.
        image_url: String,
    },
    InputFile {
        #[serde(skip_serializing_if = "Option::is_none")]
        file_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_data: Option<String>,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::InputText { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::InputImage {
            image_url: url.into(),
        }
    }

    /// Inline image bytes as a base64 `data:` URL.
    pub fn image_bytes(mime: &str, bytes: &[u8]) -> Self {
        ContentPart::InputImage {
            image_url: format!("data:{};base64,{}", mime, BASE64.encode(bytes)),
        }
    }

    /// Reference to a previously uploaded file.
    pub fn file_id(id: impl Into<String>) -> Self {
        ContentPart::InputFile {
            file_id: Some(id.into()),
            filename: None,
            file_data: None,
        }
    }

    /// Inline file bytes as a base64 `data:` URL, bypassing the upload step.
    pub fn file_bytes(filename: impl Into<String>, mime: &str, bytes: &[u8]) -> Self {
        ContentPart::InputFile {
            file_id: None,
            filename: Some(filename.into()),
            file_data: Some(format!("data:{};base64,{}", mime, BASE64.encode(bytes))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallOutput {
    pub call_id: String,
    pub output: Value,
    #[serde(rename = "type")]
    pub r#type: String,
}

impl FunctionCallOutput {
    pub fn new(call_id: impl Into<String>, output: Value) -> Self {
        Self {
            call_id: call_id.into(),
            output,
            r#type: "function_call_output".to_string(),
        }
    }
}

/// Tool made available to the model for one request.
///
/// Function tools dispatch locally; the code interpreter runs inside the
/// service and needs no local handling beyond declaring it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    Function(FunctionTool),
    CodeInterpreter { container: Value },
}

impl ToolDefinition {
    /// Code interpreter with an auto-provisioned container.
    pub fn code_interpreter() -> Self {
        ToolDefinition::CodeInterpreter {
            container: serde_json::json!({ "type": "auto" }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionTool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolChoice {
    None,
    Auto,
    Required,
    Function { name: String },
}

impl Serialize for ToolChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            ToolChoice::None => serializer.serialize_str("none"),
            ToolChoice::Auto => serializer.serialize_str("auto"),
            ToolChoice::Required => serializer.serialize_str("required"),
            ToolChoice::Function { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("type", "function")?;
                map.end()
            }
        }
    }
}
