//! Error types for request dispatch.
//!
//! This module contains the errors that can occur while a request is being
//! assembled, sent, or read back.
//!
//! # Error Handling
//!
//! - [`EncodingError`]: The payload cannot be serialized for its content type.
//!   Raised before any network activity; the request is never sent.
//! - [`TransportError`]: The transport failed before a response arrived
//!   (connection refused, timeout, DNS failure).
//! - [`ResponseParseError`]: The response body does not parse as its declared
//!   content type. This one is not fatal: it travels inside
//!   [`ResponseResult`](crate::clients::ResponseResult) next to the raw body.
//! - [`DispatchError`]: Unified error type returned by
//!   [`ApiClient::api_call`](crate::clients::ApiClient::api_call).
//!
//! A non-2xx status is never an error at this layer. It is returned as
//! normal data for the caller to interpret.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_dispatch::clients::DispatchError;
//!
//! match client.api_call(request).await {
//!     Ok(result) if result.is_success() => println!("{:?}", result.data),
//!     Ok(result) => println!("API answered {}", result.status_code),
//!     Err(DispatchError::Encoding(e)) => println!("Bad payload: {e}"),
//!     Err(DispatchError::Transport(e)) => println!("Network error: {e}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Error returned when a payload cannot be encoded for its content type.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A form content type was used with a payload that is not a mapping.
    #[error("Cannot encode a non-mapping payload as {content_type}.")]
    NotAMapping {
        /// The normalized content type.
        content_type: String,
    },

    /// A form field holds an array or object.
    #[error("Form field '{field}' holds a nested value; only scalar form values can be encoded as {content_type}.")]
    NestedFormValue {
        /// The offending field name.
        field: String,
        /// The normalized content type.
        content_type: String,
    },

    /// A structured payload was given for a content type with no encoder.
    #[error("No encoder for structured payloads with content type '{content_type}'. Pass a pre-serialized string instead.")]
    UnsupportedContentType {
        /// The normalized content type.
        content_type: String,
    },

    /// A multipart field contains the boundary delimiter.
    #[error("Multipart field '{field}' contains the boundary '{boundary}'.")]
    BoundaryInContent {
        /// The offending field name.
        field: String,
        /// The boundary in use.
        boundary: String,
    },

    /// JSON serialization failed.
    #[error("Failed to serialize JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broad classification of a [`TransportError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established (refused, reset, DNS).
    Connect,
    /// The transport's timeout elapsed.
    Timeout,
    /// Any other failure before a complete response was received.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Timeout => write!(f, "timeout"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Error returned when the transport fails before a response is obtained.
///
/// # Example
///
/// ```rust
/// use rest_dispatch::clients::{TransportError, TransportErrorKind};
///
/// let error = TransportError::new(TransportErrorKind::Connect, "connection refused");
/// assert_eq!(error.to_string(), "Transport error (connect): connection refused");
/// ```
#[derive(Debug, Error)]
#[error("Transport error ({kind}): {message}")]
pub struct TransportError {
    /// What kind of failure occurred.
    pub kind: TransportErrorKind,
    /// A human-readable description.
    pub message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates a transport error without an underlying cause.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping an underlying cause.
    #[must_use]
    pub fn with_source(
        kind: TransportErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if the transport timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }

    /// Returns `true` if the connection could not be established.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.kind == TransportErrorKind::Connect
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self::with_source(kind, error.to_string(), error)
    }
}

/// A response body that did not parse as its declared content type.
///
/// The raw body is still available as
/// [`ResponseData::Text`](crate::clients::ResponseData::Text).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Failed to parse response body as {content_type}: {message}")]
pub struct ResponseParseError {
    /// The declared response content type.
    pub content_type: String,
    /// The parser's error message.
    pub message: String,
}

/// Unified error type for [`ApiClient::api_call`](crate::clients::ApiClient::api_call).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The payload could not be encoded; nothing was sent.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The transport failed before a response was obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<reqwest::Error> for DispatchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_messages_name_the_content_type() {
        let error = EncodingError::NotAMapping {
            content_type: "application/x-www-form-urlencoded".to_string(),
        };
        assert!(error
            .to_string()
            .contains("application/x-www-form-urlencoded"));

        let error = EncodingError::NestedFormValue {
            field: "tags".to_string(),
            content_type: "multipart/form-data".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("tags"));
        assert!(message.contains("multipart/form-data"));
    }

    #[test]
    fn test_transport_error_kind_helpers() {
        let error = TransportError::new(TransportErrorKind::Timeout, "deadline elapsed");
        assert!(error.is_timeout());
        assert!(!error.is_connect());
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = TransportError::with_source(TransportErrorKind::Connect, "refused", io);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_dispatch_error_is_transparent() {
        let error: DispatchError =
            TransportError::new(TransportErrorKind::Connect, "connection refused").into();
        assert_eq!(
            error.to_string(),
            "Transport error (connect): connection refused"
        );
    }

    #[test]
    fn test_response_parse_error_message() {
        let error = ResponseParseError {
            content_type: "application/json".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(error.to_string().contains("application/json"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &EncodingError::UnsupportedContentType {
            content_type: "application/xml".to_string(),
        };
        let _: &dyn std::error::Error =
            &TransportError::new(TransportErrorKind::Other, "broken pipe");
        let _: &dyn std::error::Error = &ResponseParseError {
            content_type: "application/json".to_string(),
            message: "eof".to_string(),
        };
    }
}
