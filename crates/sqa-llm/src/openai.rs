use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sqa_core::{Service, StageError};
use tracing::debug;

use crate::prompt::ChatRequest;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Text-in, text-out completion service.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns the first completion's text, untrimmed.
    async fn complete(&self, request: &ChatRequest) -> Result<String, StageError>;
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    pub base_url: String,
    api_key: String,
    pub model: String,
}

impl OpenAiClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Body<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: RespMsg,
}

#[derive(Deserialize)]
struct RespMsg {
    content: Option<String>,
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, StageError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = Body {
            model: &self.model,
            messages: vec![
                Msg { role: "system", content: &request.system },
                Msg { role: "user", content: &request.user },
            ],
            max_tokens: request.max_tokens,
        };
        debug!("POST {url} model={}", self.model);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(transport)?;
        parse_completion_response(status, &text)
    }
}

/// Extracts the first choice's message content from a chat-completion response.
pub fn parse_completion_response(status: u16, body: &str) -> Result<String, StageError> {
    if !(200..300).contains(&status) {
        return Err(StageError::Request {
            service: Service::Model,
            status,
            body: body.to_string(),
        });
    }
    let parsed: Resp = serde_json::from_str(body).map_err(|e| data_shape(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| data_shape("response has no choices".to_string()))?;
    choice
        .message
        .content
        .ok_or_else(|| data_shape("first choice has no message content".to_string()))
}

fn transport(e: reqwest::Error) -> StageError {
    StageError::Transport {
        service: Service::Model,
        message: e.to_string(),
    }
}

fn data_shape(message: String) -> StageError {
    StageError::DataShape {
        service: Service::Model,
        message,
    }
}
