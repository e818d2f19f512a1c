//! Error types for tradebook-store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {message}")]
    Backend { message: String },

    #[error("Serialization error")]
    Serialize(#[from] serde_json::Error),

    #[error("Internal error")]
    InternalError,
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
