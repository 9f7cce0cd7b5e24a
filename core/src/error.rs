//! Error types for the HTTP client wrapper.
//!
//! # Design
//! Two variants only. `InvalidArgument` is raised before the transport is
//! touched, so callers know no request left the process. `Transport` means a
//! network attempt was made and failed below the HTTP layer; it carries the
//! transport's diagnostic text verbatim. HTTP status codes are never mapped
//! to errors.

/// Errors returned by `HttpClient` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A required argument was missing or malformed. No network activity
    /// happened.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transfer failed at the transport level (DNS, connect, TLS, I/O).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ClientError::InvalidArgument(msg.into())
    }
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
