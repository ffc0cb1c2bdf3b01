use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("animation modes mutually exclusive")]
    AnimationConflict,
    #[error("invalid ring '{0}', expected 'top' or 'bottom'")]
    InvalidRing(String),
    #[error("invalid color '{0}', expected six hex digits")]
    InvalidColor(String),
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed event payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<EventError> for ApiError {
    fn from(value: EventError) -> Self {
        Self::new(ErrorCode::MalformedEvent, value.to_string())
    }
}
