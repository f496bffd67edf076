//! `reqwest` client for `/chat/completions` endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::planner::ports::{Completion, CompletionClient, CompletionError, CompletionRequest};

/// Longest response body excerpt kept in error messages.
const ERROR_EXCERPT_CHARS: usize = 500;

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    /// Base URL including the API version, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Bearer token.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Completion token limit.
    pub max_tokens: u32,
}

/// OpenAI-compatible completion client.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    http: Client,
    url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompletionClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::NotConfigured`] when the API key or model
    /// is blank, or [`CompletionError::Transport`] when the HTTP client
    /// cannot be built.
    pub fn new(settings: OpenAiSettings) -> Result<Self, CompletionError> {
        if settings.api_key.trim().is_empty() {
            return Err(CompletionError::NotConfigured("missing API key".to_owned()));
        }
        if settings.model.trim().is_empty() {
            return Err(CompletionError::NotConfigured("missing model name".to_owned()));
        }
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            url: completions_url(&settings.base_url),
            model: settings.model,
            api_key: settings.api_key,
            max_tokens: settings.max_tokens,
        })
    }

    fn request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_EXCERPT_CHARS).collect()
}

fn parse_response(body: &str, requested_model: &str) -> Result<Completion, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| CompletionError::InvalidResponse(err.to_string()))?;
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::InvalidResponse("response has no choices".to_owned()))?;
    Ok(Completion {
        text,
        model: response
            .model
            .unwrap_or_else(|| requested_model.to_owned()),
    })
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        debug!(model = %self.model, url = %self.url, "requesting completion");
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Transport(err.to_string())
                }
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }
        parse_response(&body, &self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenAiCompletionClient, OpenAiSettings, completions_url, parse_response};
    use crate::planner::ports::{CompletionError, CompletionRequest};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::time::Duration;

    #[fixture]
    fn settings() -> OpenAiSettings {
        OpenAiSettings {
            base_url: "https://api.example.com/v1/".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            api_key: "sk-test".to_owned(),
            timeout: Duration::from_secs(30),
            max_tokens: 2_000,
        }
    }

    #[rstest]
    fn builds_chat_completions_url() {
        assert_eq!(
            completions_url("https://api.example.com/v1/"),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[rstest]
    fn serialises_system_and_user_turns(settings: OpenAiSettings) {
        let client = OpenAiCompletionClient::new(settings).expect("client builds");
        let request = CompletionRequest {
            system_prompt: "You plan content.".to_owned(),
            user_message: "Five reels please".to_owned(),
            temperature: 0.5,
        };

        let body = serde_json::to_value(client.request_body(&request)).expect("serialisable");

        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "You plan content."},
                    {"role": "user", "content": "Five reels please"},
                ],
                "temperature": 0.5,
                "max_tokens": 2000,
            })
        );
    }

    #[rstest]
    fn rejects_missing_api_key(mut settings: OpenAiSettings) {
        settings.api_key = String::new();
        assert!(matches!(
            OpenAiCompletionClient::new(settings),
            Err(CompletionError::NotConfigured(_))
        ));
    }

    #[rstest]
    fn reads_first_choice() {
        let body = r#"{"model":"gpt-4o-mini-2024","choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;

        let completion = parse_response(body, "gpt-4o-mini").expect("parsed");

        assert_eq!(completion.text, "hi");
        assert_eq!(completion.model, "gpt-4o-mini-2024");
    }

    #[rstest]
    #[case(r#"{"choices":[]}"#)]
    #[case("<html>bad gateway</html>")]
    #[case(r#"{"choices":[{"message":{"content":null}}]}"#)]
    fn rejects_responses_without_text(#[case] body: &str) {
        assert!(matches!(
            parse_response(body, "m"),
            Err(CompletionError::InvalidResponse(_))
        ));
    }
}
