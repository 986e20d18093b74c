/// LLM Client — the single point of entry for chat-completion calls.
///
/// No other module talks to the OpenAI API directly; services depend on the
/// `ChatModel` trait so tests can substitute a canned model.
///
/// Model: gpt-4o-mini, JSON response format.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// A chat model that returns the text of its reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

/// Calls `model` and deserializes its reply as JSON, stripping markdown fences.
pub async fn call_json<T: DeserializeOwned>(
    model: &dyn ChatModel,
    messages: &[ChatMessage],
) -> Result<T, LlmError> {
    let text = model.complete(messages).await?;
    serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
}

/// OpenAI chat-completions client with retry on 429 and 5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

/// Outcome of one HTTP attempt that did not produce a response.
enum Attempt {
    /// Worth trying again after backoff: transport errors, 429 and 5xx.
    Retry(LlmError),
    /// Any other non-success status.
    Fail(LlmError),
}

/// 1s before the second attempt, 2s before the third.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << (attempt - 1))
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    /// Makes a raw call, returning the full response object.
    pub async fn call(&self, messages: &[ChatMessage]) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let mut last_error = None;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying LLM call");
                tokio::time::sleep(delay).await;
            }

            match self.send_once(&request_body).await {
                Ok(chat_response) => {
                    if let Some(usage) = &chat_response.usage {
                        debug!(
                            prompt_tokens = usage.prompt_tokens,
                            completion_tokens = usage.completion_tokens,
                            "LLM call succeeded"
                        );
                    }
                    return Ok(chat_response);
                }
                Err(Attempt::Fail(e)) => return Err(e),
                Err(Attempt::Retry(e)) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    async fn send_once(&self, body: &ChatRequest<'_>) -> Result<ChatResponse, Attempt> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Attempt::Retry(e.into()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ChatResponse>()
                .await
                .map_err(|e| Attempt::Fail(e.into()));
        }

        let text = response.text().await.unwrap_or_default();
        let error = LlmError::Api {
            status: status.as_u16(),
            message: api_error_message(text),
        };
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            warn!(status = status.as_u16(), %error, "LLM API call failed");
            Err(Attempt::Retry(error))
        } else {
            Err(Attempt::Fail(error))
        }
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let response = self.call(messages).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of an OpenAI error body, else returns the body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<OpenAiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Removes a surrounding markdown code fence (with or without a `json` tag).
/// An unterminated fence keeps everything after the opening marker.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
