//! HTTP/JSON client for the note-assist service.

use async_trait::async_trait;
use note_assist_types::*;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9110";

#[derive(Debug)]
pub enum AssistClientError {
    /// The request never produced a response.
    Transport(String),
    /// The service answered with a non-success status.
    Server { status: u16, message: String },
    /// The response body was not the expected JSON.
    Decode(String),
}

impl fmt::Display for AssistClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistClientError::Transport(e) => write!(f, "request failed: {}", e),
            AssistClientError::Server { status, message } => {
                write!(f, "[HTTP {}] {}", status, message)
            }
            AssistClientError::Decode(e) => write!(f, "unexpected response: {}", e),
        }
    }
}

impl std::error::Error for AssistClientError {}

/// Anything that can answer an assist request.
#[async_trait]
pub trait AssistBackend: Send + Sync {
    async fn assist(&self, req: &AssistRequest) -> Result<AssistResponse, AssistClientError>;
}

pub struct NoteAssistClient {
    base_url: String,
    client: reqwest::Client,
}

impl NoteAssistClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn default_local() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    pub async fn get_status(&self) -> Result<ServiceStatus, AssistClientError> {
        let resp = self
            .client
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await
            .map_err(|e| AssistClientError::Transport(e.to_string()))?;
        decode(resp).await
    }

    async fn post<T: serde::Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, AssistClientError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| AssistClientError::Transport(e.to_string()))?;
        decode(resp).await
    }
}

async fn decode<R: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<R, AssistClientError> {
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| AssistClientError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorResponse>(&bytes)
            .map(|e| e.error)
            .unwrap_or_else(|_| status.to_string());
        return Err(AssistClientError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| AssistClientError::Decode(e.to_string()))
}

#[async_trait]
impl AssistBackend for NoteAssistClient {
    async fn assist(&self, req: &AssistRequest) -> Result<AssistResponse, AssistClientError> {
        self.post("/api/ai", req).await
    }
}
