//! Anthropic messages API client used by the assist endpoint.

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// AI API error with status code information
#[derive(Debug, Clone)]
pub struct AiError {
    pub message: String,
    /// HTTP status code if available
    pub status_code: Option<u16>,
}

impl AiError {
    pub fn new(message: impl Into<String>) -> Self {
        AiError {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        AiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.status_code {
            write!(f, "[HTTP {}] {}", code, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AiError {}

/// Something that turns a fully composed prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    /// Model identifier reported on the status endpoint.
    fn model(&self) -> &str;
}

/// Compose the single user turn sent upstream.
pub fn compose_prompt(prompt: &str, context: Option<&str>) -> String {
    let note = match context {
        Some(c) if !c.is_empty() => c,
        _ => "(empty note)",
    };
    format!(
        "You are a helpful AI assistant for a note-taking app. The user is working on their notes and needs help with brainstorming and expanding their ideas.\n\
         \n\
         Current note content:\n\
         {note}\n\
         \n\
         User request:\n\
         {prompt}\n\
         \n\
         Please provide helpful, concise suggestions that will be added to their notes. Be creative, insightful, and actionable."
    )
}

#[derive(Debug, Serialize)]
struct ClaudeCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<SimpleClaudeMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct SimpleClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClaudeCompletionResponse {
    #[serde(default)]
    content: Vec<ClaudeResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponseContent {
    #[serde(rename = "type", default)]
    content_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct ClaudeClient {
    client: reqwest::Client,
    auth_headers: header::HeaderMap,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    pub fn new(api_key: &str, endpoint: Option<&str>, model: Option<&str>) -> Result<Self, String> {
        let mut auth_headers = header::HeaderMap::new();
        auth_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let auth_value = header::HeaderValue::from_str(api_key)
            .map_err(|e| format!("Invalid API key format: {}", e))?;
        auth_headers.insert("x-api-key", auth_value);
        auth_headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        Ok(Self {
            client: crate::http::shared_client().clone(),
            auth_headers,
            endpoint: endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = ClaudeCompletionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![SimpleClaudeMessage {
                role: "user",
                content: prompt,
            }],
        };

        log::debug!("[CLAUDE] Sending request to {} (model {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.auth_headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::new(format!("Claude API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[CLAUDE] API returned {}: {}", status, body);
            return Err(AiError::with_status("Anthropic API error", status.as_u16()));
        }

        let data: ClaudeCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::new(format!("Failed to parse Claude response: {}", e)))?;

        data.content
            .into_iter()
            .filter(|c| c.content_type.as_deref().is_none_or(|t| t == "text"))
            .find_map(|c| c.text)
            .ok_or_else(|| AiError::new("Claude response has no text content"))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
