//! Error types for slash-tip storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (org, user, ...).
        entity: &'static str,
        /// The key that was looked up.
        id: String,
    },

    /// Remaining allowance is smaller than the requested deduction.
    #[error("insufficient allowance: remaining={remaining}, required={required}")]
    InsufficientAllowance {
        /// Remaining daily allowance.
        remaining: i64,
        /// Requested deduction.
        required: i64,
    },
}
