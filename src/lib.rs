//! # rest-dispatch
//!
//! A request-dispatch core for building REST API client libraries.
//!
//! ## Overview
//!
//! A client library built on this crate is a set of thin endpoint methods,
//! one per API operation. Each one describes its call (verb, path, query,
//! payload, headers) as a [`RequestSpec`] and hands it to
//! [`ApiClient::api_call`]. The core takes care of the rest:
//!
//! - Credential resolution from explicit values or environment variables,
//!   done once at construction ([`config`])
//! - Pluggable authentication headers ([`auth`])
//! - Default headers merged with per-call overrides
//! - Payload encoding driven by `Content-Type` (JSON, URL-encoded forms,
//!   multipart forms)
//! - Percent-encoded query strings
//! - Response normalization into a uniform [`ResponseResult`], with optional
//!   raw request/response diagnostics
//!
//! ## Quick Start
//!
//! ```rust
//! use rest_dispatch::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .credential("token", "EXAMPLE_API_TOKEN", Some("explicit-token"))
//!     .user_agent("example-client", "1.0.0")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.user_agent(), "example-client/1.0.0");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use rest_dispatch::{ApiClient, HttpMethod, RequestSpec};
//! use rest_dispatch::auth::BearerAuth;
//!
//! let client = ApiClient::new(config, BearerAuth::new("token"))?;
//!
//! let request = RequestSpec::builder(HttpMethod::Get, "/items")
//!     .query_param("limit", 50)
//!     .build();
//!
//! let result = client.api_call(request).await?;
//! println!("{} {:?}", result.status_code, result.data);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Environment variables are read once, when the
//!   configuration is built
//! - **Transport-faithful**: No retries, no redirects of its own, and a
//!   non-2xx status is data, not an error
//! - **Thread-safe**: Clients are `Send + Sync` and share read-only configuration
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{
    BaseUrl, ClientConfig, ClientConfigBuilder, CredentialResolver, CredentialValue, Credentials,
};
pub use error::ConfigError;

// Re-export dispatch types
pub use clients::{
    ApiClient, DispatchError, EncodingError, HttpMethod, Payload, QueryValue, RequestSpec,
    ResponseData, ResponseParseError, ResponseResult, Transport, TransportError,
};
