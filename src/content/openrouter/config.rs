use super::error::{OpenRouterError, OpenRouterResult};

/// Endpoint used when `OPENROUTER_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Model used when `OPENROUTER_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-thinking-exp:free";

/// Runtime configuration describing how to reach OpenRouter.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API root, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model identifier, e.g. `openai/gpt-4o-mini`.
    pub model: String,
}

impl OpenRouterConfig {
    /// Construct a configuration for the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> OpenRouterResult<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(OpenRouterError::MissingEnvVar {
                var: "OPENROUTER_API_KEY",
            })?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("OPENROUTER_MODEL") {
            config = config.with_model(model);
        }
        if let Ok(base_url) = std::env::var("OPENROUTER_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        Ok(config)
    }
}
