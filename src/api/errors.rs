use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{EngineError, RegistryError};

/// Error as returned to clients: a stable code plus a readable message.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Malformed input, e.g. broken JSON.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BadRequestError", message)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::new(err.code(), err.to_string())
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Engine(e) => e.into(),
            RegistryError::TableNotFound(_) => ApiError::new("TableNotFoundError", err.to_string()),
            RegistryError::CodesExhausted | RegistryError::Poisoned(_) => {
                ApiError::new("InternalError", err.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(err.to_string())
    }
}
