//! Chat completion client.

use crate::config::ResolvedConfig;
use crate::error::LlmError;
use reqwest::blocking::Client;
use reqwest::Proxy;
use serde::Deserialize;
use slidegen_core::{ContentGenerator, Error, GenerationRequest, Result};

/// Client for one OpenAI-compatible endpoint.
///
/// Each call is a single request; failures are reported, never retried.
pub struct ChatClient {
    config: ResolvedConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Build a client from a resolved configuration.
    pub fn new(config: ResolvedConfig) -> std::result::Result<Self, LlmError> {
        log::debug!("Creating chat client: {:?}", config);

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(proxy) = &config.http_proxy {
            builder = builder.proxy(Proxy::http(proxy)?);
        }
        if let Some(proxy) = &config.https_proxy {
            builder = builder.proxy(Proxy::https(proxy)?);
        }

        Ok(Self {
            config,
            http: builder.build()?,
        })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}chat/completions", self.config.base_url)
    }

    /// Request body for the chat completions API.
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": self.config.temperature,
        })
    }

    /// Send one completion request and return the message text.
    pub fn complete(&self, request: &GenerationRequest) -> std::result::Result<String, LlmError> {
        let body = self.build_request_body(request);
        log::debug!(
            "POST {} (model {}, {} prompt bytes)",
            self.endpoint(),
            self.config.model,
            request.system_prompt.len() + request.user_prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        parse_response(&text)
    }

    /// Context appended to errors surfaced to the caller.
    fn error_context(&self) -> String {
        match &self.config.custom_base_url {
            Some(url) => format!(" (Using custom base URL: {})", url),
            None => String::new(),
        }
    }
}

/// Extract the first choice's message content.
fn parse_response(body: &str) -> std::result::Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("response has no message content".to_string()))
}

impl ContentGenerator for ChatClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.complete(request).map_err(|e| {
            Error::Generation(format!(
                "{} API Error: {}{}",
                self.config.provider,
                e,
                self.error_context()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    fn client(config: GenerationConfig) -> ChatClient {
        ChatClient::new(config.resolve().unwrap()).unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "rules".to_string(),
            user_prompt: "User-provided content:\nnotes".to_string(),
        }
    }

    #[test]
    fn test_request_body() {
        let client = client(GenerationConfig {
            provider: "openai".to_string(),
            model: "gpt-4-turbo".to_string(),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        });
        let body = client.build_request_body(&request());

        assert_eq!(body["model"], "gpt-4-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "rules");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_parse_response() {
        let body = r###"{"choices":[{"index":0,"message":{"role":"assistant","content":"## Hello"}}]}"###;
        assert_eq!(parse_response(body).unwrap(), "## Hello");
    }

    #[test]
    fn test_parse_response_without_content() {
        assert!(matches!(
            parse_response(r#"{"choices":[]}"#),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(parse_response("<html>"), Err(LlmError::Json(_))));
    }

    #[test]
    fn test_error_context_names_custom_url() {
        let client = client(GenerationConfig {
            api_key: Some("sk-test".to_string()),
            custom_base_url: Some("http://localhost:8080/v1".to_string()),
            custom_model: Some("local".to_string()),
            ..Default::default()
        });
        assert_eq!(
            client.error_context(),
            " (Using custom base URL: http://localhost:8080/v1/)"
        );
    }

    #[test]
    fn test_bad_proxy_is_rejected() {
        let config = GenerationConfig {
            api_key: Some("sk-test".to_string()),
            http_proxy: Some("::not a url::".to_string()),
            ..Default::default()
        };
        assert!(ChatClient::new(config.resolve().unwrap()).is_err());
    }
}
