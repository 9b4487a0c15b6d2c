//! Error types for token construction and parsing.

use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The shared secret is unset or empty. A token cannot be forged
    /// without one, so this aborts the operation that needed it.
    #[error("shared secret is not configured")]
    MissingSecret,

    /// Token does not have the `payload.signature` shape.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// A token segment is not valid URL-safe base64.
    #[error("invalid base64 in token: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// Decoded payload is not valid UTF-8.
    #[error("token payload is not UTF-8: {0}")]
    InvalidPayload(#[from] std::string::FromUtf8Error),
}
