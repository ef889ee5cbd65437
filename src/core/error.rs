use std::time::Duration;

use thiserror::Error;

/// Error type shared across the crate.
///
/// Remote failures are propagated as-is: there is no retry, no backoff, and
/// no partial-failure recovery. Callers that care about a specific condition
/// (a deleted response handle, a rate limit) can use the predicate helpers
/// instead of matching on variants.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Client-side configuration problems: missing environment variables,
    /// malformed endpoints, reqwest client construction failures.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input rejected before any request was issued.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request never produced an HTTP response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service answered with a non-success status.
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A payload arrived but could not be decoded into the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The event stream ended or misbehaved mid-transfer.
    #[error("Stream error: {0}")]
    Stream(String),

    /// The model requested a tool that is not registered. Fatal for the
    /// turn; no follow-up request is issued.
    #[error("Tool '{0}' is not registered")]
    ToolNotFound(String),

    /// A registered tool handler returned an error.
    #[error("Tool '{name}' failed: {message}")]
    ToolExecution { name: String, message: String },

    /// The dispatch loop hit its round cap without the model settling on a
    /// final answer.
    #[error("Tool dispatch exceeded the limit of {limit} rounds")]
    ToolRoundLimit { limit: u32 },

    /// The dispatch loop ran past its wall-clock budget.
    #[error("Tool dispatch timed out after {timeout:?}")]
    ToolTimeout { timeout: Duration },
}

impl LlmError {
    /// HTTP status of the underlying API failure, when there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// True when the service reported the resource as gone. Deleting a
    /// response handle twice surfaces this condition on the second call.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == Some(429)
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_predicates_only_match_api_errors() {
        let not_found = LlmError::Api {
            message: "Response with id 'resp_x' not found.".to_string(),
            status_code: Some(404),
            source: None,
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_rate_limited());

        let throttled = LlmError::Api {
            message: "Rate limit reached".to_string(),
            status_code: Some(429),
            source: None,
        };
        assert!(throttled.is_rate_limited());

        let unauthorized = LlmError::Api {
            message: "Incorrect API key provided".to_string(),
            status_code: Some(401),
            source: None,
        };
        assert!(unauthorized.is_auth_error());

        let local = LlmError::InvalidInput("prompt must not be empty".to_string());
        assert_eq!(local.status_code(), None);
        assert!(!local.is_not_found());
    }

    #[test]
    fn display_includes_context() {
        let err = LlmError::ToolNotFound("get_stock_price".to_string());
        assert_eq!(err.to_string(), "Tool 'get_stock_price' is not registered");

        let err = LlmError::ToolRoundLimit { limit: 8 };
        assert!(err.to_string().contains("8 rounds"));
    }
}
