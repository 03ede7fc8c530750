use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by snapshot stores regardless of the underlying medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The medium could not be read or written.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Context of the failed operation.
        message: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Stored data exists but cannot be decoded or encoded.
    #[error("corrupt snapshot: {message}")]
    Corrupt {
        /// Context of the failed operation.
        message: String,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corruption error from a (de)serialization failure.
    pub fn corrupt(message: String, source: serde_json::Error) -> Self {
        StorageError::Corrupt { message, source }
    }
}
