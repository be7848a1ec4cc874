//! Error types for the deck API client.
//!
//! # Design
//! The backend answers failures with plain text, so `Request` displays that
//! text verbatim; UI layers surface `err.to_string()` unchanged. The status
//! code rides along for callers that want to branch on 401 vs 404.

use thiserror::Error;

/// Errors returned by `DeckClient` parse methods and `DeckApi` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token provider produced no usable bearer token.
    #[error("No authentication token found")]
    MissingToken,

    /// An empty id was supplied where a request path needs one.
    #[error("{resource} id is required")]
    MissingId { resource: &'static str },

    /// The id cannot be carried as a single path segment.
    #[error("{resource} id {id:?} is not a valid path segment")]
    InvalidId { resource: &'static str, id: String },

    /// The backend answered with a non-2xx status. `message` is the raw
    /// response body.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The connection failed below HTTP: no response, or a body cut off
    /// mid-read.
    #[error("{0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status of a `Request` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::MissingToken) || self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_backend_text_verbatim() {
        let err = ApiError::Request {
            status: 404,
            message: "Deck not found".to_string(),
        };
        assert_eq!(err.to_string(), "Deck not found");
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn missing_token_counts_as_unauthorized() {
        let err = ApiError::MissingToken;
        assert_eq!(err.to_string(), "No authentication token found");
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn transport_error_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = ApiError::Transport(Box::new(io));
        assert_eq!(err.to_string(), "connection refused");
        assert!(std::error::Error::source(&err).is_some());
    }
}
