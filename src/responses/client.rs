//! Shared client logic for providers that expose the responses API.
//!
//! A [`ResponsesClient`] is constructed explicitly from a [`ProviderConfig`]
//! value and passed wherever it is needed; there is no ambient global
//! client. The client covers the full resource surface: create (blocking
//! and streamed), retrieve, delete, input-item listing, and file upload.

use crate::core::error::LlmError;
use crate::core::http::{HttpClient, HttpClientConfig};
use crate::provider::{Provider, constants};
use crate::responses::request::CreateRequest;
use crate::responses::response::{Deleted, InputItemList, Response};
use crate::responses::stream::EventStream;

/// Configuration trait for providers that expose the responses API.
pub trait ProviderConfig {
    /// Which platform this configuration talks to.
    fn provider(&self) -> Provider;

    /// Base URL up to and including the API root, without a trailing slash
    /// (e.g. `https://api.openai.com/v1`).
    fn base_url(&self) -> &str;

    /// Model requested when the caller does not name one. For Azure this
    /// is the deployment name.
    fn default_model(&self) -> &str;

    /// Authentication header as a (name, value) tuple.
    fn auth_header(&self) -> (String, String);

    /// Query parameters appended to every request (e.g. Azure's
    /// `api-version`).
    fn default_query(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Additional headers to include with each request.
    fn extra_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::default()
    }

    fn user_agent(&self) -> String {
        format!("parlance/{}", env!("CARGO_PKG_VERSION"))
    }
}

/// Client for one provider's responses surface.
pub struct ResponsesClient<P: ProviderConfig> {
    pub config: P,
    http: HttpClient,
}

impl<P: ProviderConfig> ResponsesClient<P> {
    /// Create a new client from the given configuration.
    pub fn new(config: P) -> Result<Self, LlmError> {
        let http_config = config.http_config();
        let user_agent = config.user_agent();

        let http = HttpClient::new(http_config, Some(&user_agent))?;

        Ok(Self { config, http })
    }

    /// Model name used when a request does not override it.
    pub fn model(&self) -> &str {
        self.config.default_model()
    }

    /// Run one turn to completion and return the full response.
    #[tracing::instrument(
        name = "responses_create",
        skip(self, request),
        fields(base_url = %self.config.base_url(), model = %request.model),
        err
    )]
    pub async fn create(&self, request: CreateRequest) -> Result<Response, LlmError> {
        // This entry point always blocks for the full response; the stream
        // flag belongs to `stream`.
        let mut request = request;
        request.stream = None;

        let url = self.endpoint_url(constants::RESPONSES_ENDPOINT)?;
        self.http.post_json(&url, &self.headers(), &request).await
    }

    /// Run one turn as a lazily consumed event stream.
    ///
    /// The request is sent immediately; events arrive as the service
    /// produces them. Dropping the returned stream cancels the transfer.
    #[tracing::instrument(
        name = "responses_stream",
        skip(self, request),
        fields(base_url = %self.config.base_url(), model = %request.model),
        err
    )]
    pub async fn stream(&self, request: CreateRequest) -> Result<EventStream, LlmError> {
        let mut request = request;
        request.stream = Some(true);

        let url = self.endpoint_url(constants::RESPONSES_ENDPOINT)?;
        let response = self.http.post_stream(&url, &self.headers(), &request).await?;
        Ok(EventStream::new(response))
    }

    /// Fetch a stored response by its handle.
    #[tracing::instrument(name = "responses_retrieve", skip(self), err)]
    pub async fn retrieve(&self, response_id: &str) -> Result<Response, LlmError> {
        let url = self.endpoint_url(&format!(
            "{}/{}",
            constants::RESPONSES_ENDPOINT,
            response_id
        ))?;
        self.http.get_json(&url, &self.headers()).await
    }

    /// Delete a stored response.
    ///
    /// Deletion is at-most-once: a second delete of the same handle fails
    /// with a not-found condition.
    #[tracing::instrument(name = "responses_delete", skip(self), err)]
    pub async fn delete(&self, response_id: &str) -> Result<Deleted, LlmError> {
        let url = self.endpoint_url(&format!(
            "{}/{}",
            constants::RESPONSES_ENDPOINT,
            response_id
        ))?;
        self.http.delete_json(&url, &self.headers()).await
    }

    /// List the input items that produced a stored response.
    #[tracing::instrument(name = "responses_list_input_items", skip(self), err)]
    pub async fn list_input_items(&self, response_id: &str) -> Result<InputItemList, LlmError> {
        let url = self.endpoint_url(&format!(
            "{}/{}/input_items",
            constants::RESPONSES_ENDPOINT,
            response_id
        ))?;
        self.http.get_json(&url, &self.headers()).await
    }

    pub(crate) fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![self.config.auth_header()];
        headers.extend(self.config.extra_headers());
        headers
    }

    pub(crate) fn endpoint_url(&self, path: &str) -> Result<String, LlmError> {
        let url = format!("{}{}", self.config.base_url(), path);
        let query = self.config.default_query();
        if query.is_empty() {
            return Ok(url);
        }
        reqwest::Url::parse_with_params(&url, &query)
            .map(String::from)
            .map_err(|e| LlmError::Configuration(format!("Invalid endpoint URL {url}: {e}")))
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }
}
