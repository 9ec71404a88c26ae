//! Credential resolution.
//!
//! Credentials are resolved once, when a [`ClientConfig`](crate::ClientConfig)
//! is built. For every credential name, a non-empty explicit value wins;
//! otherwise the named environment variable is used when it is set and
//! non-empty; otherwise the credential stays unset. The rule applies per key.
//!
//! Unset credentials are not an error here. An API that needs them reports
//! the problem itself (typically with a 401 response).

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::newtypes::CredentialValue;

/// Where a resolved credential came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// The value was passed explicitly at construction.
    Explicit,
    /// The value was read from an environment variable.
    Environment,
}

/// Declares credential names, their environment variables, and any
/// explicitly supplied values.
///
/// # Example
///
/// ```rust
/// use rest_dispatch::config::CredentialResolver;
///
/// let resolver = CredentialResolver::new()
///     .env_var("token", "EXAMPLE_API_TOKEN")
///     .explicit("token", "from-argument");
///
/// let credentials = resolver.resolve_with(|_| Some("from-env".to_string()));
/// assert_eq!(credentials.get("token").unwrap().expose(), "from-argument");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CredentialResolver {
    env_vars: IndexMap<String, String>,
    explicit: IndexMap<String, String>,
}

impl CredentialResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the environment variable used as fallback for `name`.
    #[must_use]
    pub fn env_var(mut self, name: impl Into<String>, var: impl Into<String>) -> Self {
        self.env_vars.insert(name.into(), var.into());
        self
    }

    /// Supplies an explicit value for `name`.
    ///
    /// An empty value counts as "not supplied".
    #[must_use]
    pub fn explicit(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.explicit.insert(name.into(), value.into());
        self
    }

    /// Drops any explicit value supplied for `name`.
    #[must_use]
    pub fn clear_explicit(mut self, name: &str) -> Self {
        self.explicit.shift_remove(name);
        self
    }

    /// Returns every declared credential name, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.env_vars
            .keys()
            .chain(
                self.explicit
                    .keys()
                    .filter(|name| !self.env_vars.contains_key(*name)),
            )
            .map(String::as_str)
    }

    /// Resolves credentials against the process environment.
    #[must_use]
    pub fn resolve(&self) -> Credentials {
        self.resolve_with(|var| std::env::var(var).ok())
    }

    /// Resolves credentials using `lookup` in place of the process environment.
    #[must_use]
    pub fn resolve_with<F>(&self, lookup: F) -> Credentials
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = HashMap::new();

        for name in self.names() {
            let explicit = self.explicit.get(name).filter(|value| !value.is_empty());

            let resolved = if let Some(value) = explicit {
                Some((value.clone(), CredentialSource::Explicit))
            } else {
                self.env_vars
                    .get(name)
                    .and_then(|var| lookup(var.as_str()))
                    .filter(|value| !value.is_empty())
                    .map(|value| (value, CredentialSource::Environment))
            };

            match resolved {
                Some((value, source)) => {
                    tracing::debug!(credential = name, ?source, "Resolved credential");
                    values.insert(name.to_string(), (CredentialValue::new(value), source));
                }
                None => {
                    tracing::debug!(credential = name, "Credential is unset");
                }
            }
        }

        Credentials { values }
    }
}

/// The resolved credential mapping held by a [`ClientConfig`](crate::ClientConfig).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    values: HashMap<String, (CredentialValue, CredentialSource)>,
}

impl Credentials {
    /// Creates an empty credential set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, if it resolved.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CredentialValue> {
        self.values.get(name).map(|(value, _)| value)
    }

    /// Returns where `name` was resolved from, if it resolved.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<CredentialSource> {
        self.values.get(name).map(|(_, source)| *source)
    }

    /// Returns `true` if `name` resolved to a value.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of resolved credentials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no credential resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
