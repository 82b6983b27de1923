//! # Fetch Error Types
//!
//! ## User-Facing Messages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  What happened                       user_message()                    │
//! │  ─────────────                       ──────────────                    │
//! │  Response with non-2xx status   ──►  "Error 404: Not Found"            │
//! │  No response (DNS, refused, ...) ─►  transport message                 │
//! │  No response, empty message     ──►  "Failed to load data"             │
//! │  Body is not the expected JSON  ──►  "Failed to decode response: ..."  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::FALLBACK_ERROR_MESSAGE;

/// Errors from reading the catalog API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("Error {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// The message stored in a resource's `error` field.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(message) if message.trim().is_empty() => {
                FALLBACK_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Builds a `Status` error, using the canonical reason phrase.
    pub fn status(status: u16, reason: Option<&str>) -> Self {
        FetchError::Status {
            status,
            reason: reason.unwrap_or("Unknown").to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::status(status.as_u16(), status.canonical_reason()),
            None => FetchError::Transport(err.to_string()),
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
