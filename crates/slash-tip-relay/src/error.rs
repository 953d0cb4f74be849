//! Error types for the relay client.

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur talking to the relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Network or protocol failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay returned a non-success status.
    #[error("relay error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error body, or the status line when the body is unreadable.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}
