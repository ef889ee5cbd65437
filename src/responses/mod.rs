pub(crate) mod client;
pub(crate) mod files;
pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod stream;

pub use client::{ProviderConfig, ResponsesClient};
pub use files::{FileObject, FilePurpose, FileUpload};
pub use request::{
    Content, ContentPart, CreateRequest, FunctionCallOutput, FunctionTool, Input, InputItem,
    InputMessage, Role, ToolChoice, ToolDefinition,
};
pub use response::{
    CodeInterpreterCall, Deleted, FunctionCall, InputItemList, ListedInputItem, MessageContent,
    OutputItem, OutputMessage, Response, ResponseError, Status, Usage,
};
pub use stream::{EventStream, StreamEvent};
