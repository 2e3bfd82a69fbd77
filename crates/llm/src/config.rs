//! Provider table and generation configuration.

use crate::error::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A built-in provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    Claude,
}

impl Provider {
    /// Parse a provider name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            "claude" => Some(Self::Claude),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Claude => "claude",
        }
    }

    /// OpenAI-compatible endpoint base, with trailing slash.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/",
            Self::OpenAi => "https://api.openai.com/v1/",
            Self::Claude => "https://api.anthropic.com/v1/",
        }
    }

    /// Known models as (short name, model id), default first.
    pub fn models(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Gemini => &[
                ("gemini-2.5-flash", "gemini-2.5-flash"),
                ("gemini-1.5-pro", "gemini-1.5-pro"),
                ("gemini-1.5-flash", "gemini-1.5-flash"),
            ],
            Self::OpenAi => &[
                ("gpt-4", "gpt-4"),
                ("gpt-4-turbo", "gpt-4-turbo"),
                ("gpt-3.5-turbo", "gpt-3.5-turbo"),
            ],
            Self::Claude => &[
                ("claude-3-5-sonnet", "claude-3-5-sonnet-20240620"),
                ("claude-3-opus", "claude-3-opus-20240229"),
                ("claude-3-sonnet", "claude-3-sonnet-20240229"),
            ],
        }
    }

    /// Model id for a short name; unknown names get the default model.
    pub fn model_id(&self, name: &str) -> &'static str {
        let models = self.models();
        models
            .iter()
            .find(|(short, _)| *short == name)
            .unwrap_or(&models[0])
            .1
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for one generation run, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider name: gemini, openai or claude.
    pub provider: String,

    /// Model short name (or any id, with a custom endpoint).
    pub model: String,

    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint to use instead of the provider's.
    pub custom_base_url: Option<String>,

    /// Model id for the custom endpoint.
    pub custom_model: Option<String>,

    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,

    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            custom_base_url: None,
            custom_model: None,
            http_proxy: None,
            https_proxy: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// A configuration with provider, endpoint and model settled.
#[derive(Clone, PartialEq)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub base_url: String,
    pub model: String,
    pub api_key: String,

    /// Set when the endpoint was supplied by the caller.
    pub custom_base_url: Option<String>,

    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub temperature: f32,
    pub timeout: Duration,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("http_proxy", &self.http_proxy)
            .field("https_proxy", &self.https_proxy)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenerationConfig {
    /// Validate the settings and pick endpoint and model.
    ///
    /// A custom endpoint replaces the provider's and is treated as
    /// OpenAI-compatible. Its model is `custom_model` when given, otherwise
    /// `model` sent verbatim. A custom model without an endpoint is ignored.
    pub fn resolve(&self) -> Result<ResolvedConfig, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Config("API key is required".to_string()))?
            .to_string();

        let named_provider = || {
            Provider::from_name(&self.provider)
                .ok_or_else(|| LlmError::Config(format!("Unsupported provider: {}", self.provider)))
        };

        let (provider, base_url, model, custom_base_url) =
            match self.custom_base_url.as_deref().filter(|u| !u.is_empty()) {
                Some(url) => {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        return Err(LlmError::Config(
                            "Custom base URL must start with 'http://' or 'https://'".to_string(),
                        ));
                    }
                    let url = if url.ends_with('/') {
                        url.to_string()
                    } else {
                        format!("{}/", url)
                    };
                    let (provider, model) =
                        match self.custom_model.as_deref().filter(|m| !m.is_empty()) {
                            Some(model) => (Provider::OpenAi, model),
                            None => (named_provider()?, self.model.as_str()),
                        };
                    (provider, url.clone(), model.to_string(), Some(url))
                }
                None => {
                    let provider = named_provider()?;
                    (
                        provider,
                        provider.base_url().to_string(),
                        provider.model_id(&self.model).to_string(),
                        None,
                    )
                }
            };

        Ok(ResolvedConfig {
            provider,
            base_url,
            model,
            api_key,
            custom_base_url,
            http_proxy: self.http_proxy.clone().filter(|p| !p.is_empty()),
            https_proxy: self.https_proxy.clone().filter(|p| !p.is_empty()),
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
