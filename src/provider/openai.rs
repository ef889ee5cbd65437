//! OpenAI platform configuration.

use crate::core::error::LlmError;
use crate::core::http::HttpClientConfig;
use crate::provider::{Provider, constants};
use crate::responses::client::ProviderConfig;

/// Connection settings for the OpenAI platform.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: String,
    model: String,
    base_url: String,
    http_config: HttpClientConfig,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: constants::openai::DEFAULT_MODEL.to_string(),
            base_url: constants::openai::API_BASE.to_string(),
            http_config: HttpClientConfig::default(),
        }
    }

    /// Read the API key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var(constants::openai::API_KEY_ENV_VAR).map_err(|_| {
            LlmError::Configuration(format!("{} not set", constants::openai::API_KEY_ENV_VAR))
        })?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a compatible gateway instead of the platform
    /// default.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_config(mut self, http_config: HttpClientConfig) -> Self {
        self.http_config = http_config;
        self
    }
}

impl ProviderConfig for OpenAiConfig {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )
    }

    fn http_config(&self) -> HttpClientConfig {
        self.http_config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let config = OpenAiConfig::new("sk-test").with_base_url("https://gateway.local/v1/");
        assert_eq!(config.base_url(), "https://gateway.local/v1");
    }

    #[test]
    fn auth_header_is_bearer() {
        let config = OpenAiConfig::new("sk-test");
        let (name, value) = config.auth_header();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer sk-test");
        assert_eq!(config.default_model(), "gpt-4o-mini");
    }
}
