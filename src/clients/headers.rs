//! Header composition.
//!
//! The headers of every request are built from three layers, in increasing
//! precedence:
//!
//! 1. the defaults (`Accept`, `Content-Type`, `User-Agent`),
//! 2. the client's authentication headers,
//! 3. the per-call overrides.
//!
//! A later layer replaces a same-named header from an earlier one. Header
//! names compare ASCII case-insensitively and the later spelling is kept.

use indexmap::IndexMap;

use crate::auth::AuthStrategy;
use crate::config::ClientConfig;

/// The default media type for `Accept` and `Content-Type`.
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// An ordered header mapping.
pub type Headers = IndexMap<String, String>;

/// Inserts a header, replacing any existing header with the same name
/// regardless of case.
pub fn set_header(headers: &mut Headers, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value.into());
}

/// Looks up a header by name, ignoring case.
#[must_use]
pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Returns the default header layer for `user_agent`.
#[must_use]
pub fn default_headers(user_agent: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), DEFAULT_MEDIA_TYPE.to_string());
    headers.insert("Content-Type".to_string(), DEFAULT_MEDIA_TYPE.to_string());
    headers.insert("User-Agent".to_string(), user_agent.to_string());
    headers
}

/// Composes the final headers for one request.
///
/// Overrides are applied in their insertion order, so the result depends
/// only on the inputs.
#[must_use]
pub fn compose_headers(
    config: &ClientConfig,
    auth: &dyn AuthStrategy,
    overrides: &Headers,
) -> Headers {
    let mut headers = default_headers(config.user_agent());

    for (name, value) in auth.headers(config.credentials()) {
        set_header(&mut headers, name, value);
    }

    for (name, value) in overrides {
        set_header(&mut headers, name.clone(), value.clone());
    }

    headers
}
