//! Conversation flows over a responses client.
//!
//! The service retains conversation state; consecutive turns are linked by
//! handle, not by replaying history. A [`Conversation`] tracks the handle
//! of its latest completed turn and threads it into the next request.

use std::time::{Duration, Instant};

use crate::core::error::LlmError;
use crate::core::tools::{DispatchGuard, DispatchLimits, ToolSet};
use crate::responses::client::{ProviderConfig, ResponsesClient};
use crate::responses::request::{CreateRequest, Input, InputItem};
use crate::responses::response::{Response, Usage};
use crate::responses::stream::EventStream;

/// Outcome of one completed turn.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Concatenated message text.
    pub text: String,

    /// Handle of this exchange. Chains the next turn and drives retrieval
    /// and deletion.
    pub response_id: String,

    /// Identifier of the first output item, when the service assigned one.
    pub message_id: Option<String>,

    /// Token accounting, when the service reports it.
    pub usage: Option<Usage>,

    /// Wall-clock duration of the exchange, dispatch rounds included.
    pub elapsed: Duration,
}

/// Drives single, chained, tool-dispatch, and streamed turns against one
/// client.
pub struct Conversation<'c, P: ProviderConfig> {
    client: &'c ResponsesClient<P>,
    model: String,
    instructions: Option<String>,
    limits: DispatchLimits,
    last_response_id: Option<String>,
}

impl<'c, P: ProviderConfig> Conversation<'c, P> {
    pub fn new(client: &'c ResponsesClient<P>) -> Self {
        Self {
            client,
            model: client.model().to_string(),
            instructions: None,
            limits: DispatchLimits::default(),
            last_response_id: None,
        }
    }

    /// Continue from a handle produced earlier, possibly by another
    /// process. The service supplies that turn's context.
    pub fn resume(client: &'c ResponsesClient<P>, response_id: impl Into<String>) -> Self {
        let mut conversation = Self::new(client);
        conversation.last_response_id = Some(response_id.into());
        conversation
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_limits(mut self, limits: DispatchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Handle of the latest completed turn.
    pub fn last_response_id(&self) -> Option<&str> {
        self.last_response_id.as_deref()
    }

    /// Record an externally completed response as this conversation's
    /// latest turn. Streamed turns use this: the stream owns its events,
    /// so the caller hands the terminal snapshot back explicitly.
    pub fn adopt(&mut self, response: &Response) {
        self.last_response_id = Some(response.id.clone());
    }

    /// Send one text prompt and block for the reply.
    ///
    /// The prompt must be non-empty; nothing is sent otherwise.
    pub async fn send(&mut self, prompt: &str) -> Result<Reply, LlmError> {
        validate_prompt(prompt)?;
        self.run_turn(Input::Text(prompt.to_string())).await
    }

    /// Send explicit input items (multimodal content parts, prepared tool
    /// results).
    pub async fn send_items(&mut self, items: Vec<InputItem>) -> Result<Reply, LlmError> {
        if items.is_empty() {
            return Err(LlmError::InvalidInput(
                "input items must not be empty".to_string(),
            ));
        }
        self.run_turn(Input::Items(items)).await
    }

    /// Send a prompt with tools on offer and run the dispatch loop until
    /// the model settles on text.
    ///
    /// Every function call in a response is answered with exactly one
    /// result, in the order the calls were issued; the results go back as
    /// a follow-up chained to that response. A call whose name is not in
    /// the set fails the turn before any follow-up is sent. The loop is
    /// bounded by the configured [`DispatchLimits`].
    pub async fn send_with_tools(
        &mut self,
        prompt: &str,
        tools: &ToolSet,
    ) -> Result<Reply, LlmError> {
        validate_prompt(prompt)?;

        let timeout = self.limits.timeout;
        match tokio::time::timeout(timeout, self.tool_turn(prompt, tools)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::ToolTimeout { timeout }),
        }
    }

    /// Open a streamed turn.
    ///
    /// The request goes out immediately; the returned stream yields events
    /// as the service produces them and ends with the terminal snapshot.
    /// To chain a later turn onto a streamed one, pass the snapshot from
    /// [`StreamEvent::Completed`] to [`Conversation::adopt`].
    ///
    /// [`StreamEvent::Completed`]: crate::responses::StreamEvent::Completed
    pub async fn stream(&self, prompt: &str) -> Result<EventStream, LlmError> {
        validate_prompt(prompt)?;
        let request = self.base_request(Input::Text(prompt.to_string()));
        self.client.stream(request).await
    }

    async fn run_turn(&mut self, input: Input) -> Result<Reply, LlmError> {
        let started = Instant::now();
        let request = self.base_request(input);
        let response = self.client.create(request).await?;
        self.last_response_id = Some(response.id.clone());
        Ok(reply_from(response, started.elapsed()))
    }

    #[tracing::instrument(
        name = "tool_dispatch",
        level = "debug",
        skip(self, prompt, tools),
        fields(model = %self.model),
        err
    )]
    async fn tool_turn(&mut self, prompt: &str, tools: &ToolSet) -> Result<Reply, LlmError> {
        let started = Instant::now();
        let mut guard = DispatchGuard::new(&self.limits);
        let definitions = tools.definitions();

        // The first round carries the prompt; later rounds carry only tool
        // results, chained to the round before them.
        let mut request = self.base_request(Input::Text(prompt.to_string()));
        if !definitions.is_empty() {
            request.tools = Some(definitions.clone());
        }

        loop {
            guard.begin_round()?;
            tracing::debug!(round = guard.rounds(), "Dispatch round started");

            let response = self.client.create(request).await?;
            self.last_response_id = Some(response.id.clone());

            let calls = response.function_calls();
            if calls.is_empty() {
                tracing::debug!("No tool calls pending, turn complete");
                return Ok(reply_from(response, started.elapsed()));
            }

            tracing::info!(count = calls.len(), "Model requested tool execution");

            let mut outputs = Vec::with_capacity(calls.len());
            for call in calls {
                let output = tools.dispatch(call).await?;
                outputs.push(InputItem::FunctionCallOutput(output));
            }

            let mut follow_up =
                CreateRequest::new(self.model.clone(), Input::Items(outputs));
            follow_up.previous_response_id = Some(response.id.clone());
            follow_up.instructions = self.instructions.clone();
            if !definitions.is_empty() {
                follow_up.tools = Some(definitions.clone());
            }
            request = follow_up;
        }
    }

    fn base_request(&self, input: Input) -> CreateRequest {
        let mut request = CreateRequest::new(self.model.clone(), input);
        request.instructions = self.instructions.clone();
        request.previous_response_id = self.last_response_id.clone();
        request
    }
}

fn reply_from(response: Response, elapsed: Duration) -> Reply {
    Reply {
        text: response.output_text(),
        message_id: response.first_output_id().map(str::to_string),
        usage: response.usage,
        response_id: response.id,
        elapsed,
    }
}

fn validate_prompt(prompt: &str) -> Result<(), LlmError> {
    if prompt.trim().is_empty() {
        return Err(LlmError::InvalidInput(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(())
}
