//! Error taxonomy for remote operations.
//!
//! # Design
//! Every non-fatal failure of a remote call is exactly one of five kinds, so
//! callers can match exhaustively. Library error types never leak through
//! `ApiError`; only their message text is kept for diagnostics. Status codes
//! outside the backend contract are not represented here at all: the
//! classifier treats them as fatal.

use thiserror::Error;

use crate::transport::TransportError;

/// Failure of a login, todo-fetch or todo-update call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained: connection refused, DNS failure, timeout,
    /// connection dropped before a status line.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a 5xx status.
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// The backend answered with a 4xx status.
    #[error("client error: HTTP {0}")]
    Client(u16),

    /// Login reached the backend but no user has the given username.
    #[error("no user matches the given username")]
    InvalidUsername,

    /// Anything else on the call path, including malformed success bodies.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server(code) | ApiError::Client(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => ApiError::Network(msg),
            TransportError::Other(msg) => ApiError::Unexpected(msg),
        }
    }
}
