//! Error types for sync client construction.
//!
//! Runtime call failures never become errors; they fold into
//! [`crate::SyncOutcome::Failed`]. This enum only covers configuration
//! problems caught when the client is built.

use thiserror::Error;

/// Errors that can occur while building a [`crate::SyncClient`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// No external endpoint URL is configured.
    #[error("sync endpoint URL is not configured")]
    MissingEndpoint,

    /// The configured endpoint URL does not parse.
    #[error("invalid sync endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The shared secret is unset or empty.
    #[error(transparent)]
    Token(#[from] gridgate_token::TokenError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
