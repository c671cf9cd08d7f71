//! Error types for the checklist API client.
//!
//! # Design
//! Non-2xx responses become `FetchError::Http` carrying the status, a
//! user-facing message and optional field-level `details`, so callers can
//! branch on status and render per-field validation messages. A failed
//! exchange (no response at all) is `Transport` and has no status.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Message shown for every 5xx response. Server text is never surfaced.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again later";

/// Field name to validation messages, as sent in an error body's `details`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors returned by `FetchClient` and `HttpClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        details: Option<FieldErrors>,
    },

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl FetchError {
    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&FieldErrors> {
        match self {
            FetchError::Http { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// User-facing message. For `Http` this is the classified message alone.
    pub fn message(&self) -> String {
        match self {
            FetchError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Error envelope the backend sends with 4xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<FieldErrors>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_on_http_error() {
        let err = FetchError::Http {
            status: 404,
            message: "Resource not found".to_string(),
            details: None,
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.message(), "Resource not found");
        assert!(err.details().is_none());
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert!(err.details().is_none());
        assert_eq!(err.message(), "transport failed: connection refused");
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
        assert!(body.details.is_none());
    }
}
