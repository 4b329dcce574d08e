//! Reasoning backend settings, shared by every entry point.

use crate::reasoning::{self, GeminiClient, OpenAICompatibleClient, ReasoningClient};
use async_openai::config::OpenAIConfig;
use std::str::FromStr;
use std::sync::Arc;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported reasoning backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAI,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => reasoning::gemini::DEFAULT_MODEL,
            Provider::OpenAI => reasoning::openai::DEFAULT_MODEL,
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Gemini => write!(f, "gemini"),
            Provider::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAI),
            other => Err(ConfigError::InvalidValue(
                "REASONING_PROVIDER".to_string(),
                format!("'{}' is not a supported provider (gemini, openai)", other),
            )),
        }
    }
}

/// Which backend to call and how.
#[derive(Clone)]
pub struct ReasoningSettings {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
}

// The API key stays out of debug output and therefore out of logs.
impl std::fmt::Debug for ReasoningSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningSettings")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ReasoningSettings {
    /// Loads settings from environment variables.
    ///
    /// `provider` and `model` override `REASONING_PROVIDER` and
    /// `ANALYSIS_MODEL` when given.
    pub fn from_env_with(
        provider: Option<Provider>,
        model: Option<String>,
    ) -> Result<Self, ConfigError> {
        let provider = match provider {
            Some(provider) => provider,
            None => std::env::var("REASONING_PROVIDER")
                .unwrap_or_else(|_| "gemini".to_string())
                .parse()?,
        };

        let api_key = std::env::var(provider.api_key_var())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::MissingVar(format!(
                    "{} must be set for '{}' provider",
                    provider.api_key_var(),
                    provider
                ))
            })?;

        let model = model
            .or_else(|| std::env::var("ANALYSIS_MODEL").ok())
            .unwrap_or_else(|| provider.default_model().to_string());
        let base_url = std::env::var("REASONING_BASE_URL").ok();

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(None, None)
    }

    /// Builds the client for the configured provider.
    pub fn build_client(&self) -> Arc<dyn ReasoningClient> {
        match self.provider {
            Provider::Gemini => Arc::new(GeminiClient::new(
                self.api_key.clone(),
                self.model.clone(),
                self.base_url.clone(),
            )),
            Provider::OpenAI => {
                let mut config = OpenAIConfig::new().with_api_key(&self.api_key);
                if let Some(base_url) = &self.base_url {
                    config = config.with_api_base(base_url);
                }
                Arc::new(OpenAICompatibleClient::new(config, self.model.clone()))
            }
        }
    }
}
