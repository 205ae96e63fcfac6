use serde_json::Value;
use thiserror::Error;

/// Failure reported by the backend.
///
/// The backend either rejects a request with plain text or with a structured
/// object that may carry a `message` field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("{0}")]
    Text(String),

    #[error("{}", .message.as_deref().unwrap_or("backend request failed"))]
    Structured { message: Option<String> },
}

impl BackendError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Structured {
            message: Some(message.into()),
        }
    }

    /// Classify a raw rejection payload.
    pub fn from_payload(payload: Value) -> Self {
        match payload {
            Value::String(text) => Self::Text(text),
            Value::Object(mut fields) => match fields.remove("message") {
                Some(Value::String(message)) => Self::Structured {
                    message: Some(message),
                },
                _ => Self::Structured { message: None },
            },
            _ => Self::Structured { message: None },
        }
    }

    /// Text shown to the user: plain text verbatim, else the carried message,
    /// else `fallback`.
    pub fn display_or(&self, fallback: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured {
                message: Some(message),
            } if !message.is_empty() => message.clone(),
            Self::Structured { .. } => fallback.to_string(),
        }
    }
}

impl From<String> for BackendError {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for BackendError {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
