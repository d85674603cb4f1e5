//! Shared types for the note-assist service and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of the 400 returned when the prompt is missing or empty.
pub const PROMPT_REQUIRED: &str = "Prompt is required";

/// Body of every 500 returned by the assist endpoint.
pub const AI_REQUEST_FAILED: &str = "Failed to process AI request";

/// Title given to freshly created notes.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

// =====================================================
// Domain Types
// =====================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// A new note with the default title and empty content, stamped `now`.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =====================================================
// Request / Response Types
// =====================================================

/// `POST /api/ai` body. Both fields are optional on the wire so a missing
/// prompt can be reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AssistRequest {
    pub fn new(prompt: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            context: Some(context.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistResponse {
    pub result: String,
    /// Set on canned fallback responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<bool>,
}

impl AssistResponse {
    pub fn generated(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            demo: None,
        }
    }

    pub fn demo(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            demo: Some(true),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// A credential is configured; prompts go to the provider.
    Anthropic,
    /// No credential; canned templates are served.
    Demo,
}

impl std::fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderMode::Anthropic => write!(f, "anthropic"),
            ProviderMode::Demo => write!(f, "demo"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub provider: ProviderMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
