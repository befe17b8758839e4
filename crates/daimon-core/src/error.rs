//! Errors raised while validating inbound requests

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("prompt is {len} characters, limit is {max}")]
    PromptTooLong { len: usize, max: usize },

    #[error("invalid request body: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Malformed(err.to_string())
    }
}
