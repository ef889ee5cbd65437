//! Azure OpenAI configuration.
//!
//! Azure serves the same responses surface under `{endpoint}/openai/v1`
//! with an `api-version` query parameter. The deployment name doubles as
//! the model name.

use crate::core::error::LlmError;
use crate::core::http::HttpClientConfig;
use crate::provider::{Provider, constants};
use crate::responses::client::ProviderConfig;

/// Connection settings for an Azure OpenAI resource.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    api_key: String,
    deployment: String,
    base_url: String,
    api_version: String,
    http_config: HttpClientConfig,
}

impl AzureConfig {
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            api_key: api_key.into(),
            deployment: deployment.into(),
            base_url: format!("{}/openai/v1", endpoint.trim_end_matches('/')),
            api_version: constants::azure::DEFAULT_API_VERSION.to_string(),
            http_config: HttpClientConfig::default(),
        }
    }

    /// Read endpoint, deployment, and API key from `AZURE_OPENAI_ENDPOINT`,
    /// `AZURE_OPENAI_DEPLOYMENT_NAME`, and `AZURE_OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, LlmError> {
        let endpoint = Self::env_var(constants::azure::ENDPOINT_ENV_VAR)?;
        let deployment = Self::env_var(constants::azure::DEPLOYMENT_ENV_VAR)?;
        let api_key = Self::env_var(constants::azure::API_KEY_ENV_VAR)?;
        Ok(Self::new(endpoint, deployment, api_key))
    }

    fn env_var(name: &str) -> Result<String, LlmError> {
        std::env::var(name).map_err(|_| LlmError::Configuration(format!("{name} not set")))
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_http_config(mut self, http_config: HttpClientConfig) -> Self {
        self.http_config = http_config;
        self
    }
}

impl ProviderConfig for AzureConfig {
    fn provider(&self) -> Provider {
        Provider::AzureOpenAI
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_model(&self) -> &str {
        &self.deployment
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )
    }

    fn default_query(&self) -> Vec<(String, String)> {
        vec![("api-version".to_string(), self.api_version.clone())]
    }

    fn http_config(&self) -> HttpClientConfig {
        self.http_config.clone()
    }
}
