//! # parlance
//!
//! Conversations with hosted response APIs, minus the ceremony.
//!
//! ## ⚠️ WARNING
//!
//! This is a pre-release version with an unstable API. Breaking changes may occur between versions.
//! Use with caution and pin to specific versions in production applications.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlance::{Conversation, OpenAiConfig, ResponsesClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResponsesClient::new(OpenAiConfig::from_env()?)?;
//! let mut conversation = Conversation::new(&client);
//!
//! let reply = conversation.send("What is 2+2?").await?;
//! println!("{}", reply.text);
//!
//! // The next turn continues where the last one left off; the service
//! // keeps the history.
//! let reply = conversation.send("Add 10 to that.").await?;
//! println!("{}", reply.text);
//! Ok(())
//! }
//! ```
//!
//! Streaming, tool dispatch, multimodal input, file upload, and response
//! lifecycle management live on the same two types; see [`Conversation`]
//! and [`ResponsesClient`].

pub mod conversation;
pub mod core;
pub mod provider;
pub mod responses;

pub use conversation::{Conversation, Reply};
pub use core::error::LlmError;
pub use core::http::HttpClientConfig;
pub use core::tools::{DispatchLimits, ToolHandler, ToolSet, function_tool};
pub use provider::{AzureConfig, OpenAiConfig, Provider};
pub use responses::{ProviderConfig, ResponsesClient};
