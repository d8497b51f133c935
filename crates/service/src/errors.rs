use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("registry error: {0}")]
    Store(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("command error: {0}")]
    Command(String),
    #[error("helm install failed ({status}): {output}")]
    Install { status: String, output: String },
    #[error("command timed out after {0:?}")]
    Timeout(Duration),
    #[error("This service plan requires client support for asynchronous service operations.")]
    AsyncRequired,
    #[error("{0} is not supported by this broker")]
    Unsupported(&'static str),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Message without the kind prefix, used by plain-text responses.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<redis::RedisError> for ServiceError {
    fn from(e: redis::RedisError) -> Self { Self::Store(e.to_string()) }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self { Self::Decode(e.to_string()) }
}
