//! OpenAI-compatible chat-completions client.
//!
//! Speaks the `/chat/completions` wire format, so it works against OpenAI
//! itself and any gateway (LiteLLM, OpenRouter, vLLM) exposing the same API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::LlmError;

/// Default base URL for the completion service.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model for answer generation.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A message in a conversation with an LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (e.g., "system", "user", "assistant").
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request for text generation from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model identifier; an empty string selects the provider's default.
    pub model: String,
    pub messages: Vec<Message>,
    /// Sampling temperature (0.0 - 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from an LLM generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub id: String,
    /// Model that generated this response.
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl GenerationResponse {
    /// Get the content of the first choice, if available.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// A single generated choice from the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    /// Reason the generation stopped (e.g., "stop", "length").
    pub finish_reason: String,
}

/// Token usage statistics for a generation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Sampling parameters for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2500,
            temperature: 0.7,
        }
    }
}

/// The text of one completion plus the token usage it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// Model that actually served the request.
    pub model: String,
    pub usage: Usage,
}

/// Trait for LLM providers that can generate text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a response for the given request.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Single-turn completion: one system instruction, one user prompt.
    ///
    /// Fails with [`LlmError::EmptyCompletion`] when the service returns no text.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        params: &CompletionParams,
    ) -> Result<Completion, LlmError> {
        let request = GenerationRequest::new(
            params.model.clone(),
            vec![Message::system(system), Message::user(user)],
        )
        .with_max_tokens(params.max_tokens)
        .with_temperature(params.temperature);

        let response = self.generate(request).await?;
        let text = match response.first_content() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => return Err(LlmError::EmptyCompletion),
        };

        Ok(Completion {
            text,
            model: response.model,
            usage: response.usage,
        })
    }
}

/// Client for OpenAI-compatible chat-completions APIs.
pub struct ChatClient {
    api_base: String,
    api_key: Option<String>,
    default_model: String,
    http_client: Client,
}

impl ChatClient {
    /// Create a client with explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `api_base` - Base URL, e.g. "https://api.openai.com/v1"
    /// * `api_key` - Bearer token; `None` for unauthenticated local gateways
    /// * `default_model` - Model used when a request leaves it empty
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<String>,
        default_model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
            default_model: default_model.into(),
            http_client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// - `OPENAI_API_KEY`: API key (required)
    /// - `ADFORGE_API_BASE`: Base URL (defaults to [`DEFAULT_API_BASE`])
    /// - `ADFORGE_MODEL`: Default model (defaults to [`DEFAULT_MODEL`])
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingApiKey` if `OPENAI_API_KEY` is not set or empty.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;
        let api_base =
            env::var("ADFORGE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let default_model = env::var("ADFORGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::new(api_base, Some(api_key), default_model)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Internal request structure for the OpenAI-compatible API.
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    index: u32,
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    role: String,
    /// Null when the model refused or only produced tool calls.
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl LlmProvider for ChatClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model
        };

        let api_request = ApiRequest {
            model,
            messages: request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let mut http_request = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(ref api_key) = self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {}", api_key));
        }

        let http_response = http_request
            .json(&api_request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = http_response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = http_response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());

            let message = serde_json::from_str::<ApiErrorResponse>(&error_text)
                .map(|r| r.error.message)
                .unwrap_or(error_text);

            if status_code == 429 {
                return Err(LlmError::RateLimited(message));
            }
            return Err(LlmError::ApiError {
                code: status_code,
                message,
            });
        }

        let api_response: ApiResponse = http_response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(format!("Failed to parse API response: {}", e)))?;

        let choices = api_response
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                message: Message {
                    role: choice.message.role,
                    content: choice.message.content.unwrap_or_default(),
                },
                finish_reason: choice.finish_reason.unwrap_or_default(),
            })
            .collect();

        Ok(GenerationResponse {
            id: api_response.id,
            model: api_response.model,
            choices,
            usage: api_response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Provider that replays a queue of canned responses.
    struct MockLlmProvider {
        responses: Mutex<Vec<Result<GenerationResponse, LlmError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockLlmProvider {
        fn new(responses: Vec<Result<GenerationResponse, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn response_with(content: &str) -> GenerationResponse {
        GenerationResponse {
            id: "chatcmpl-1".to_string(),
            model: "gpt-4o-mini".to_string(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(content),
                finish_reason: "stop".to_string(),
            }],
            usage: Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
        }
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("s").role, "system");
        assert_eq!(Message::user("u").role, "user");
        assert_eq!(Message::assistant("a").content, "a");
    }

    #[test]
    fn test_request_serialization_skips_unset_params() {
        let request = GenerationRequest::new("gpt-4o-mini", vec![Message::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());

        let request = request.with_temperature(0.7).with_max_tokens(2500);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.7);
        assert_eq!(json["max_tokens"], 2500);
    }

    #[test]
    fn test_api_response_tolerates_null_content() {
        let body = r#"{"id":"x","model":"m","choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}],"usage":{"prompt_tokens":1,"completion_tokens":0,"total_tokens":1}}"#;
        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ChatClient::new("http://localhost:4000/v1/", None, "m").unwrap();
        assert_eq!(client.api_base(), "http://localhost:4000/v1");
        assert!(!client.has_api_key());
        assert_eq!(client.default_model(), "m");
    }

    #[tokio::test]
    async fn test_complete_builds_two_turn_request() {
        let provider = MockLlmProvider::new(vec![Ok(response_with("## PERFORMANCE ANALYSIS"))]);
        let params = CompletionParams::default();

        let completion = provider.complete("sys", "usr", &params).await.unwrap();
        assert_eq!(completion.text, "## PERFORMANCE ANALYSIS");
        assert_eq!(completion.usage.total_tokens, 15);

        let requests = provider.requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(sent.messages, vec![Message::system("sys"), Message::user("usr")]);
        assert_eq!(sent.max_tokens, Some(2500));
        assert_eq!(sent.temperature, Some(0.7));
        assert_eq!(sent.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_complete_rejects_blank_text() {
        let provider = MockLlmProvider::new(vec![Ok(response_with("   "))]);
        let err = provider
            .complete("sys", "usr", &CompletionParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_complete_propagates_service_errors() {
        let provider =
            MockLlmProvider::new(vec![Err(LlmError::RateLimited("slow down".to_string()))]);
        let err = provider
            .complete("sys", "usr", &CompletionParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited(_)));
    }
}
