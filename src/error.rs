//! Error types for stockroom.
//!
//! All errors are strongly typed using thiserror. Two conditions that look
//! like errors deliberately are not: malformed ingestion lines are stored
//! as partially-empty rows (permissive parse), and an exhausted inventory
//! is the `Exhausted` variant of the withdrawal outcome, never an `Err`.

use thiserror::Error;

use crate::storage::StoreError;

/// Validation errors that occur while building a request.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A batch must carry a non-empty label.
    #[error("Batch label cannot be empty")]
    EmptyBatchLabel,

    /// A withdrawal must ask for at least one record.
    #[error("Withdrawal quantity must be at least 1")]
    ZeroQuantity,

    /// A required builder field was never set.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },
}

/// Top-level error type for stockroom operations.
#[derive(Debug, Error)]
pub enum StockError {
    /// Request validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store boundary failed; the current operation is aborted.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Writing an export file failed.
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invariant violation inside the engine.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl StockError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a store-boundary error.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns true if retrying the operation could succeed.
    ///
    /// Only connection failures qualify; the core never retries on its own,
    /// so this is advice for the external caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Connection(_)))
    }
}

/// Result type alias for stockroom operations.
pub type StockResult<T> = Result<T, StockError>;
