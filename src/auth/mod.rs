//! Authentication header strategies.
//!
//! APIs disagree on how credentials travel: a bearer token, a custom header,
//! HTTP basic auth, or several headers at once. An [`AuthStrategy`] turns the
//! resolved [`Credentials`] of a client into the headers its API expects.
//! The strategy is chosen per client and applied to every request, after the
//! default headers and before per-call overrides.
//!
//! Strategies never fail. When a credential they need is unset they emit
//! nothing, and the API's own error response tells the caller what is missing.
//!
//! # Example
//!
//! ```rust
//! use rest_dispatch::auth::{AuthStrategy, BearerAuth, CompositeAuth, HeaderAuth};
//! use rest_dispatch::config::CredentialResolver;
//!
//! let credentials = CredentialResolver::new()
//!     .explicit("token", "abc")
//!     .explicit("account", "42")
//!     .resolve_with(|_| None);
//!
//! let auth = CompositeAuth::new()
//!     .with(BearerAuth::new("token"))
//!     .with(HeaderAuth::new("X-Account-Id", "account"));
//!
//! let headers = auth.headers(&credentials);
//! assert_eq!(headers[0], ("Authorization".to_string(), "Bearer abc".to_string()));
//! assert_eq!(headers[1], ("X-Account-Id".to_string(), "42".to_string()));
//! ```

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::Credentials;

/// Produces authentication headers from resolved credentials.
pub trait AuthStrategy: fmt::Debug + Send + Sync {
    /// Returns the `(name, value)` header pairs to add to every request.
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)>;
}

impl<T: AuthStrategy + ?Sized> AuthStrategy for Arc<T> {
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)> {
        (**self).headers(credentials)
    }
}

impl<T: AuthStrategy + ?Sized> AuthStrategy for Box<T> {
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)> {
        (**self).headers(credentials)
    }
}

/// Adds no authentication headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoAuth;

impl AuthStrategy for NoAuth {
    fn headers(&self, _credentials: &Credentials) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Sends a credential as `Authorization: Bearer <value>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BearerAuth {
    credential: String,
}

impl BearerAuth {
    /// Uses the credential named `credential` as the bearer token.
    #[must_use]
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
        }
    }
}

impl AuthStrategy for BearerAuth {
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)> {
        credentials
            .get(&self.credential)
            .map(|token| {
                vec![(
                    "Authorization".to_string(),
                    format!("Bearer {}", token.expose()),
                )]
            })
            .unwrap_or_default()
    }
}

/// Sends a credential verbatim in a named header (e.g. `X-Api-Key`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderAuth {
    header: String,
    credential: String,
}

impl HeaderAuth {
    /// Sends the credential named `credential` in the `header` header.
    #[must_use]
    pub fn new(header: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            credential: credential.into(),
        }
    }
}

impl AuthStrategy for HeaderAuth {
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)> {
        credentials
            .get(&self.credential)
            .map(|value| vec![(self.header.clone(), value.expose().to_string())])
            .unwrap_or_default()
    }
}

/// Sends `Authorization: Basic base64(<username>:<password>)`.
///
/// Emits the header when the username credential is set. An unset password
/// is sent as empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Uses the credentials named `username` and `password`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthStrategy for BasicAuth {
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)> {
        let Some(username) = credentials.get(&self.username) else {
            return Vec::new();
        };
        let password = credentials
            .get(&self.password)
            .map_or("", |value| value.expose());

        let encoded = STANDARD.encode(format!("{}:{password}", username.expose()));
        vec![("Authorization".to_string(), format!("Basic {encoded}"))]
    }
}

/// Applies several strategies in order.
///
/// Later strategies overwrite same-named headers from earlier ones when the
/// headers are composed.
#[derive(Clone, Debug, Default)]
pub struct CompositeAuth {
    strategies: Vec<Arc<dyn AuthStrategy>>,
}

impl CompositeAuth {
    /// Creates an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy.
    #[must_use]
    pub fn with(mut self, strategy: impl AuthStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }
}

impl AuthStrategy for CompositeAuth {
    fn headers(&self, credentials: &Credentials) -> Vec<(String, String)> {
        self.strategies
            .iter()
            .flat_map(|strategy| strategy.headers(credentials))
            .collect()
    }
}
