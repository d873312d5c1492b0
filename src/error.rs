//! Error types for the card codec and the generation coordinator.

use thiserror::Error;

/// Result type alias for share-link decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors that can occur while decoding a share-link fragment.
///
/// None of these are fatal: callers fall back to the default card.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The fragment was empty (or only whitespace / a bare `#`).
    #[error("Share fragment is empty")]
    Empty,

    /// The fragment is not valid base64.
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The decoded text does not parse into a card.
    #[error("Invalid card JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by generation operations.
///
/// Every variant carries a message suitable for showing to the user; the
/// coordinator records `to_string()` as the status error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Bad input, rejected before reaching the service.
    #[error("{0}")]
    Validation(String),

    /// The external call failed or returned an unusable response.
    #[error("{0}")]
    Service(String),

    /// The generated resource could not be fetched.
    #[error("{0}")]
    Download(String),

    /// Another generation is already in flight.
    #[error("A generation is already in progress")]
    Busy,
}

impl GenerationError {
    /// Creates a Validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a Service error.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Creates a Download error.
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Returns true if the service was never contacted for this error.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Busy)
    }
}
