//! # Store Error Types
//!
//! Error types for slot and repository operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the slot key and categorization       │
//! │       │                                                                 │
//! │       ├──► CartStore: logged and swallowed (in-memory cart stays)      │
//! │       │                                                                 │
//! │       └──► MockSession / CLI: surfaced to the caller                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ecomlite_core::ValidationError;
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    ///
    /// ## When This Occurs
    /// - Data directory is not writable
    /// - Disk full
    #[error("I/O error on slot '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The slot refused a write because it is full.
    ///
    /// ## When This Occurs
    /// - A [`MemorySlot`](crate::MemorySlot) with a quota receives a value
    ///   that would push it over the limit
    #[error("Quota exceeded writing '{key}': {size} bytes over a {quota} byte limit")]
    QuotaExceeded { key: String, size: usize, quota: usize },

    /// Slot keys become file names, so only a safe subset is allowed.
    #[error("Invalid slot key: '{0}'")]
    InvalidKey(String),

    /// The write-behind worker is gone.
    #[error("Background writer stopped")]
    WriterStopped,

    /// Input rejected before anything was stored.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation that needs a logged-in user ran without one.
    #[error("Not logged in")]
    NotAuthenticated,
}

impl StoreError {
    /// Creates an Io error for a slot key.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
