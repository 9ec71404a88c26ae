//! Configuration types for API clients.
//!
//! This module provides the immutable configuration shared by every request
//! a client dispatches.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The resolved, read-only client configuration
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: A validated API base URL
//! - [`CredentialResolver`] and [`Credentials`]: Credential precedence handling
//! - [`CredentialValue`]: A credential value with masked debug output
//!
//! # Example
//!
//! ```rust
//! use rest_dispatch::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .credential("token", "EXAMPLE_API_TOKEN", Some("my-token"))
//!     .include_raw(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.include_raw());
//! assert_eq!(config.credentials().get("token").unwrap().expose(), "my-token");
//! ```

mod credentials;
mod newtypes;

pub use credentials::{CredentialResolver, CredentialSource, Credentials};
pub use newtypes::{BaseUrl, CredentialValue};

use crate::error::ConfigError;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Client name used in the default `User-Agent` header.
pub const DEFAULT_CLIENT_NAME: &str = env!("CARGO_PKG_NAME");

/// Resolved configuration for an API client.
///
/// Environment variables are consulted exactly once, in
/// [`ClientConfigBuilder::build`]. After that the configuration never
/// changes, so any number of concurrent requests may read it.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    credentials: Credentials,
    include_raw: bool,
    user_agent: String,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the resolved credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns whether responses carry a raw diagnostics block.
    #[must_use]
    pub const fn include_raw(&self) -> bool {
        self.include_raw
    }

    /// Returns the `User-Agent` header value (`<client-name>/<version>`).
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. Everything else has a default.
///
/// # Defaults
///
/// - `include_raw`: `false`
/// - `user_agent`: `rest-dispatch/<crate version>`
/// - credentials: none
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    resolver: CredentialResolver,
    credential_names: Vec<String>,
    include_raw: Option<bool>,
    client_name: Option<String>,
    client_version: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Declares a credential.
    ///
    /// `explicit` takes precedence when it is `Some` and non-empty;
    /// otherwise `env_var` is read when the configuration is built.
    /// Declaring the same name again replaces the earlier declaration,
    /// including its explicit value.
    #[must_use]
    pub fn credential(
        mut self,
        name: impl Into<String>,
        env_var: impl Into<String>,
        explicit: Option<impl Into<String>>,
    ) -> Self {
        let name = name.into();
        self.resolver = self.resolver.env_var(name.clone(), env_var);
        self.resolver = match explicit {
            Some(value) => self.resolver.explicit(name.clone(), value),
            None => self.resolver.clear_explicit(&name),
        };
        self.declare(name);
        self
    }

    /// Declares a credential that can only be supplied explicitly.
    #[must_use]
    pub fn explicit_credential(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.resolver = self.resolver.explicit(name.clone(), value);
        self.declare(name);
        self
    }

    fn declare(&mut self, name: String) {
        if !self.credential_names.contains(&name) {
            self.credential_names.push(name);
        }
    }

    /// Enables or disables the raw diagnostics block on responses.
    #[must_use]
    pub const fn include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = Some(include_raw);
        self
    }

    /// Sets the client name and version used for the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self.client_version = Some(version.into());
        self
    }

    /// Builds the [`ClientConfig`], resolving credentials from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::EmptyCredentialName`] if a credential has no name.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        self.finish(CredentialResolver::resolve)
    }

    /// Builds the [`ClientConfig`], resolving credentials with `lookup` in
    /// place of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_with<F>(self, lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.finish(|resolver| resolver.resolve_with(lookup))
    }

    fn finish<R>(self, resolve: R) -> Result<ClientConfig, ConfigError>
    where
        R: FnOnce(&CredentialResolver) -> Credentials,
    {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        if self.credential_names.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyCredentialName);
        }

        let credentials = resolve(&self.resolver);

        let user_agent = format!(
            "{}/{}",
            self.client_name.as_deref().unwrap_or(DEFAULT_CLIENT_NAME),
            self.client_version.as_deref().unwrap_or(SDK_VERSION),
        );

        Ok(ClientConfig {
            base_url,
            credentials,
            include_raw: self.include_raw.unwrap_or(false),
            user_agent,
        })
    }
}
