//! Error types for client construction.
//!
//! This module contains the errors raised while building a
//! [`ClientConfig`](crate::ClientConfig). They are fatal: a client is never
//! created from an invalid configuration, and no request is ever attempted.
//!
//! Errors raised while dispatching a request live in
//! [`clients`](crate::clients) ([`DispatchError`](crate::DispatchError)).
//!
//! # Example
//!
//! ```rust
//! use rest_dispatch::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("api.example.com");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The base URL is malformed.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with scheme and host (e.g., 'https://api.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A credential was declared without a name.
    #[error("Credential names cannot be empty.")]
    EmptyCredentialName,
}
