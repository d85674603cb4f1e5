use crate::claude::AiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use note_assist_types::{AI_REQUEST_FAILED, ErrorResponse, PROMPT_REQUIRED};
use std::fmt;

/// Failure of a single assist request.
#[derive(Debug)]
pub enum AssistError {
    /// Prompt missing or empty. The only user-correctable case.
    Validation,
    /// Provider unreachable or answered with a non-success status.
    Upstream(AiError),
    /// Request body could not be read as JSON.
    Parse(String),
}

impl AssistError {
    pub fn status(&self) -> StatusCode {
        match self {
            AssistError::Validation => StatusCode::BAD_REQUEST,
            AssistError::Upstream(_) | AssistError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller. Upstream and parse details stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            AssistError::Validation => PROMPT_REQUIRED,
            AssistError::Upstream(_) | AssistError::Parse(_) => AI_REQUEST_FAILED,
        }
    }
}

impl fmt::Display for AssistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistError::Validation => write!(f, "{}", PROMPT_REQUIRED),
            AssistError::Upstream(e) => write!(f, "upstream error: {}", e),
            AssistError::Parse(msg) => write!(f, "invalid request body: {}", msg),
        }
    }
}

impl std::error::Error for AssistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssistError::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AiError> for AssistError {
    fn from(e: AiError) -> Self {
        AssistError::Upstream(e)
    }
}

impl IntoResponse for AssistError {
    fn into_response(self) -> Response {
        if !matches!(self, AssistError::Validation) {
            log::error!("AI API error: {}", self);
        }
        (self.status(), Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AssistError::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AssistError::Parse("eof".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AssistError::from(AiError::with_status("boom", 500)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_detail_not_public() {
        let err = AssistError::from(AiError::with_status("secret detail", 401));
        assert_eq!(err.public_message(), AI_REQUEST_FAILED);
        assert!(err.to_string().contains("secret detail"));
    }
}
