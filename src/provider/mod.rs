pub(crate) mod constants;

pub(crate) mod azure;
pub(crate) mod openai;

pub use azure::AzureConfig;
pub use openai::OpenAiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    AzureOpenAI,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "OpenAI"),
            Provider::AzureOpenAI => write!(f, "Azure OpenAI"),
        }
    }
}

impl Provider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => constants::openai::API_KEY_ENV_VAR,
            Provider::AzureOpenAI => constants::azure::API_KEY_ENV_VAR,
        }
    }
}
