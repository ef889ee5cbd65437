//! Shared HTTP transport for all provider configurations.
//!
//! Requests are issued exactly once. Remote failures map onto [`LlmError`]
//! and surface unmodified; callers that want resilience layer it on top.

use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::error::LlmError;

/// Transport-level configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request deadline for unary calls. Event streams are exempt: they
    /// live until consumed or dropped.
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// Thin wrapper around a shared [`reqwest::Client`].
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// Standard error envelope returned by the service on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig, user_agent: Option<&str>) -> Result<Self, LlmError> {
        let default_ua = format!("parlance/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        // The timeout is applied per request rather than on the builder so
        // that streaming responses are not cut off mid-transfer.
        let client = reqwest::Client::builder()
            .user_agent(ua)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build reqwest client: {e}")))?;

        Ok(Self { client, config })
    }

    /// POST a JSON body and decode a JSON response.
    #[tracing::instrument(name = "http_post_json", skip(self, headers, body), fields(url = %url), err)]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let mut req = self
            .client
            .post(url)
            .timeout(self.config.timeout)
            .json(body);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let res = Self::checked(req.send().await).await?;
        Self::decode(res).await
    }

    /// GET a JSON resource.
    #[tracing::instrument(name = "http_get_json", skip(self, headers), fields(url = %url), err)]
    pub async fn get_json<Res>(&self, url: &str, headers: &[(String, String)]) -> Result<Res, LlmError>
    where
        Res: DeserializeOwned,
    {
        let mut req = self.client.get(url).timeout(self.config.timeout);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let res = Self::checked(req.send().await).await?;
        Self::decode(res).await
    }

    /// DELETE a JSON resource and decode the acknowledgement.
    #[tracing::instrument(name = "http_delete_json", skip(self, headers), fields(url = %url), err)]
    pub async fn delete_json<Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Res, LlmError>
    where
        Res: DeserializeOwned,
    {
        let mut req = self.client.delete(url).timeout(self.config.timeout);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let res = Self::checked(req.send().await).await?;
        Self::decode(res).await
    }

    /// POST a multipart form (file uploads) and decode a JSON response.
    ///
    /// The form is consumed by the send; with single-shot requests this is
    /// not a limitation.
    #[tracing::instrument(name = "http_post_multipart", skip(self, headers, form), fields(url = %url), err)]
    pub async fn post_multipart<Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        form: reqwest::multipart::Form,
    ) -> Result<Res, LlmError>
    where
        Res: DeserializeOwned,
    {
        let mut req = self
            .client
            .post(url)
            .timeout(self.config.timeout)
            .multipart(form);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let res = Self::checked(req.send().await).await?;
        Self::decode(res).await
    }

    /// POST a JSON body and hand back the raw response for incremental
    /// consumption. The status is checked here; body framing is the
    /// caller's concern.
    #[tracing::instrument(name = "http_post_stream", skip(self, headers, body), fields(url = %url), err)]
    pub async fn post_stream<Req>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<reqwest::Response, LlmError>
    where
        Req: Serialize,
    {
        let mut req = self
            .client
            .post(url)
            .header("Accept", "text/event-stream")
            .json(body);
        for (name, value) in headers {
            req = req.header(name, value);
        }
        Self::checked(req.send().await).await
    }

    /// Map transport errors and non-success statuses onto [`LlmError`].
    async fn checked(
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, LlmError> {
        let res = sent.map_err(|e| LlmError::Network {
            message: "Request failed".to_string(),
            source: Some(Box::new(e)),
        })?;

        let status = res.status();
        if status.is_success() {
            debug!(status = %status, "HTTP request successful");
            return Ok(res);
        }

        warn!(status = %status, "API returned error status");
        let error_text = res
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(Self::api_error(status, &error_text))
    }

    fn api_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        // Prefer the message out of the standard error envelope; fall back
        // to the raw body for gateways that answer in plain text.
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());

        LlmError::Api {
            message: format!("API Error ({status}): {message}"),
            status_code: Some(status.as_u16()),
            source: None,
        }
    }

    async fn decode<Res>(res: reqwest::Response) -> Result<Res, LlmError>
    where
        Res: DeserializeOwned,
    {
        let response_text = res.text().await.map_err(|e| LlmError::Parse {
            message: "Failed to read response body".to_string(),
            source: Some(Box::new(e)),
        })?;

        serde_json::from_str(&response_text).map_err(|e| LlmError::Parse {
            message: "Failed to parse API response".to_string(),
            source: Some(Box::new(e)),
        })
    }
}
