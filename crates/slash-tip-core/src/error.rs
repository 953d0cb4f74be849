//! Error types for slash-tip core operations.

/// Result type for slash-tip core operations.
pub type Result<T> = std::result::Result<T, TipError>;

/// Errors that can occur in slash-tip core operations.
#[derive(Debug, thiserror::Error)]
pub enum TipError {
    /// The action config's shape does not match the organization's action type.
    #[error("action config shape '{config}' does not match action type '{expected}'")]
    ActionConfigMismatch {
        /// The organization's configured action type.
        expected: String,
        /// The action type implied by the config blob.
        config: String,
    },

    /// An action config was supplied without an action type.
    #[error("action config supplied without an action type")]
    ActionConfigWithoutType,

    /// Amount arithmetic overflowed 128 bits.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    /// An amount could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
