pub mod error;
pub mod http;
pub mod tools;

pub use error::LlmError;
pub use http::{HttpClient, HttpClientConfig};
pub use tools::{DispatchGuard, DispatchLimits, ToolHandler, ToolSet, function_tool};
