pub mod openai {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const API_BASE: &str = "https://api.openai.com/v1";
    pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
}

pub mod azure {
    pub const API_KEY_ENV_VAR: &str = "AZURE_OPENAI_API_KEY";
    pub const ENDPOINT_ENV_VAR: &str = "AZURE_OPENAI_ENDPOINT";
    pub const DEPLOYMENT_ENV_VAR: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
    pub const DEFAULT_API_VERSION: &str = "preview";
}

pub const RESPONSES_ENDPOINT: &str = "/responses";
pub const FILES_ENDPOINT: &str = "/files";
